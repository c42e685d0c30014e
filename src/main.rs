use pricing_grid::app::App;
use pricing_grid::infra::config::settings::{default_webview_data_dir, AppSettings};
use pricing_grid::infra::logging::init_logging;

fn main() {
    let loaded = AppSettings::load();
    let settings = loaded.as_ref().cloned().unwrap_or_default();
    init_logging(&settings.log_filter);
    if let Err(err) = &loaded {
        log::warn!("using default settings: {err:#}");
    }

    let mut config = dioxus::desktop::Config::new().with_window(
        dioxus::desktop::WindowBuilder::new().with_title(settings.window_title.clone()),
    );
    match default_webview_data_dir() {
        Ok(webview_data_dir) => config = config.with_data_directory(webview_data_dir),
        Err(err) => log::warn!("webview data directory unavailable: {err:#}"),
    }

    dioxus::LaunchBuilder::desktop()
        .with_cfg(config)
        .with_context(settings)
        .launch(App);
}
