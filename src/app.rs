use std::sync::Arc;

use dioxus::prelude::*;
use rfd::{FileDialog, MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};

use crate::domain::entities::column::{column_for, ColumnDefinition, ValueKind};
use crate::domain::entities::conversion::{is_base_container, ConversionKind, ConversionTable};
use crate::domain::entities::filter::FilterPredicate;
use crate::domain::entities::navigation::{CellPosition, EditState, KeyOutcome, NavKey};
use crate::domain::entities::request::PriceHeader;
use crate::domain::entities::row::{FieldKey, RowId, RowSeed};
use crate::domain::validation::parse_iso_date;
use crate::infra::config::settings::AppSettings;
use crate::infra::mock::pricing_service::MockPricingService;
use crate::infra::mock::reference_data::MockReferenceData;
use crate::ui::state::app_state::{split_list_input, AppState};
use crate::usecase::services::grid_store::{GridEvent, GridStore};
use crate::usecase::services::import_service::ImportService;
use crate::usecase::services::reference_service::ReferenceService;
use crate::usecase::services::submission_service::{SubmissionContext, SubmissionService};

const FILTER_COLUMNS: [FieldKey; 6] = [
    FieldKey::QuoteId,
    FieldKey::GeneratorId,
    FieldKey::ContractId,
    FieldKey::JobId,
    FieldKey::RegionId,
    FieldKey::ProductId,
];

const PREVIEW_ROWS: usize = 50;

const IMPORT_EXTENSIONS: [&str; 8] = ["csv", "tsv", "txt", "xlsx", "xlsm", "xlsb", "xls", "ods"];

fn nav_key(event: &KeyboardEvent) -> Option<NavKey> {
    let shift = event.modifiers().shift();
    match event.key() {
        Key::ArrowUp => Some(NavKey::Up),
        Key::ArrowDown => Some(NavKey::Down),
        Key::ArrowLeft => Some(NavKey::Left),
        Key::ArrowRight => Some(NavKey::Right),
        Key::Tab if shift => Some(NavKey::BackTab),
        Key::Tab => Some(NavKey::Tab),
        Key::Enter if shift => Some(NavKey::ShiftEnter),
        Key::Enter => Some(NavKey::Enter),
        Key::F2 => Some(NavKey::F2),
        Key::Escape => Some(NavKey::Escape),
        Key::Character(text) => {
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => Some(NavKey::Char(ch)),
                _ => None,
            }
        }
        _ => None,
    }
}

#[derive(Clone, Debug, PartialEq)]
struct CellView {
    column: ColumnDefinition,
    value: String,
    warning: Option<String>,
    hint: Option<String>,
    options: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
struct RowView {
    id: RowId,
    cells: Vec<CellView>,
}

fn row_views(store: &GridStore) -> Vec<RowView> {
    store
        .visible_rows()
        .into_iter()
        .map(|row| {
            let warnings = store.warnings_for(row.id);
            let cells = store
                .columns()
                .iter()
                .map(|column| {
                    let warning = warnings
                        .iter()
                        .find(|(key, _)| *key == column.key)
                        .map(|(_, warning)| warning.to_string());
                    let hint = (column.key == FieldKey::MinimumPrice
                        && !is_base_container(row.get(FieldKey::ContainerSize)))
                    .then(|| store.minimum_price_hint(row.id))
                    .flatten()
                    .map(|minimum| format!("{minimum:.2} per container"));
                    let options = match column.kind {
                        ValueKind::Dropdown(source) => store.reference().option_names(source),
                        _ => Vec::new(),
                    };
                    CellView {
                        column: *column,
                        value: row.get(column.key).to_string(),
                        warning,
                        hint,
                        options,
                    }
                })
                .collect();
            RowView { id: row.id, cells }
        })
        .collect()
}

async fn focus_on_mount(event: MountedEvent) {
    if let Err(err) = event.set_focus(true).await {
        log::debug!("could not focus cell editor: {err:?}");
    }
}

#[component]
fn GridCell(
    mut store: Signal<GridStore>,
    row_id: RowId,
    position: CellPosition,
    cell: CellView,
    state: EditState,
) -> Element {
    let selected = state.is_selected(position);
    let editing = state.is_editing_at(position);
    let key = cell.column.key;
    let width = cell.column.width.css_width();
    let border = if selected {
        "2px solid #2f6fed"
    } else {
        "1px solid #ddd"
    };
    let background = if cell.warning.is_some() {
        "#fff4f4"
    } else if selected {
        "#eef4ff"
    } else {
        "#fff"
    };
    let value = cell.value.clone();

    let editor = match cell.column.kind {
        ValueKind::Dropdown(_) => {
            let mut options = cell.options.clone();
            if !value.is_empty() && !options.iter().any(|name| name == &value) {
                options.insert(0, value.clone());
            }
            rsx! {
                select {
                    style: "width: 100%;",
                    onmounted: move |event| focus_on_mount(event),
                    onchange: move |event| {
                        let chosen = event.value();
                        if chosen.is_empty() {
                            store.write().update_cell(row_id, key, "");
                        } else {
                            store.write().commit_option(row_id, key, &chosen);
                        }
                    },
                    option { value: "", selected: value.is_empty(), "" }
                    for name in options {
                        option {
                            value: "{name}",
                            selected: name == value,
                            "{name}"
                        }
                    }
                }
            }
        }
        ValueKind::Date => rsx! {
            input {
                r#type: "date",
                style: "width: 100%;",
                value: "{value}",
                onmounted: move |event| focus_on_mount(event),
                oninput: move |event| {
                    let text = event.value();
                    // The picker reports an ISO date or nothing; free text is never stored.
                    if text.trim().is_empty() {
                        store.write().update_cell(row_id, key, "");
                    } else if let Some(date) = parse_iso_date(&text) {
                        store.write().commit_date(row_id, key, date);
                    }
                }
            }
        },
        ValueKind::Text | ValueKind::Number => rsx! {
            input {
                r#type: "text",
                style: "width: 100%; box-sizing: border-box;",
                value: "{value}",
                onmounted: move |event| focus_on_mount(event),
                oninput: move |event| {
                    store.write().commit_field(event.value());
                }
            }
        },
    };

    rsx! {
        td {
            style: "border: {border}; padding: 2px 4px; min-width: {width}; background: {background}; white-space: nowrap;",
            onclick: move |_| {
                if !editing {
                    store.write().click(position);
                }
            },
            ondoubleclick: move |_| {
                if !editing {
                    store.write().double_click(position);
                }
            },
            if editing {
                {editor}
            } else {
                span { "{cell.value}" }
            }
            if let Some(warning) = cell.warning.clone() {
                span {
                    title: "{warning}",
                    style: "color: #c62828; margin-left: 4px; cursor: help;",
                    "⚠"
                }
            }
            if let Some(hint) = cell.hint.clone() {
                div { style: "font-size: 11px; color: #666;", "{hint}" }
            }
        }
    }
}

#[component]
fn ImportDialog(
    mut store: Signal<GridStore>,
    mut paste_text: Signal<String>,
    mut status: Signal<String>,
) -> Element {
    let snapshot = store.read();
    let Some(buffer) = snapshot.staging().cloned() else {
        return rsx! {};
    };
    let labels: Vec<&'static str> = snapshot.columns().iter().map(|column| column.label).collect();
    drop(snapshot);

    let staged_count = buffer.len();
    let can_commit = buffer.can_commit();
    let source = buffer.source().to_string();
    let conversion = buffer.conversion().clone();
    let is_custom = conversion.kind() == ConversionKind::Custom;
    let preview: Vec<Vec<String>> = buffer.rows().iter().take(PREVIEW_ROWS).cloned().collect();
    let hidden_count = staged_count.saturating_sub(preview.len());

    rsx! {
        div {
            style: "position: fixed; inset: 0; background: rgba(0,0,0,0.35); display: flex; align-items: center; justify-content: center; z-index: 1000;",
            div {
                style: "background: #fff; border-radius: 10px; padding: 16px; width: 90vw; max-height: 90vh; overflow: auto; box-shadow: 0 10px 24px rgba(0,0,0,0.2);",
                h3 { style: "margin-top: 0;", "Paste from Excel" }
                textarea {
                    style: "width: 100%; height: 120px; font-family: monospace;",
                    placeholder: "Copy cells in Excel and paste here",
                    value: paste_text(),
                    oninput: move |event| {
                        let text = event.value();
                        store.write().stage_text(&text);
                        paste_text.set(text);
                    }
                }
                div { style: "margin: 8px 0; color: #555;",
                    "{staged_count} row(s) ready from {source}"
                }

                div { style: "max-height: 260px; overflow: auto; border: 1px solid #ddd;",
                    table { style: "border-collapse: collapse; font-size: 12px;",
                        thead {
                            tr {
                                for label in labels.iter() {
                                    th { style: "border: 1px solid #ddd; padding: 2px 6px; background: #f5f5f5;", "{label}" }
                                }
                            }
                        }
                        tbody {
                            for row in preview {
                                tr {
                                    for value in row {
                                        td { style: "border: 1px solid #eee; padding: 2px 6px;", "{value}" }
                                    }
                                }
                            }
                        }
                    }
                }
                if hidden_count > 0 {
                    div { style: "color: #777; font-size: 12px;", "and {hidden_count} more" }
                }

                div { style: "margin-top: 12px; display: flex; gap: 16px; align-items: center;",
                    span { "Container conversion:" }
                    label {
                        input {
                            r#type: "radio",
                            name: "conversion-kind",
                            checked: !is_custom,
                            onchange: move |_| {
                                store.write().set_staging_conversion_kind(ConversionKind::Standard);
                            }
                        }
                        " Standard"
                    }
                    label {
                        input {
                            r#type: "radio",
                            name: "conversion-kind",
                            checked: is_custom,
                            onchange: move |_| {
                                store.write().set_staging_conversion_kind(ConversionKind::Custom);
                            }
                        }
                        " Custom"
                    }
                }

                table { style: "margin-top: 8px; border-collapse: collapse;",
                    for entry in conversion.entries().iter().cloned() {
                        tr {
                            td { style: "padding: 2px 8px;", "{entry.container}" }
                            td {
                                input {
                                    r#type: "number",
                                    step: "0.01",
                                    min: "0",
                                    style: "width: 90px;",
                                    disabled: !is_custom || is_base_container(&entry.container),
                                    value: "{entry.multiplier}",
                                    onchange: {
                                        let container = entry.container.clone();
                                        move |event: Event<FormData>| {
                                            let accepted = event
                                                .value()
                                                .trim()
                                                .parse::<f64>()
                                                .map(|multiplier| {
                                                    store.write().edit_staging_conversion(&container, multiplier)
                                                })
                                                .unwrap_or(false);
                                            if !accepted {
                                                *status.write() =
                                                    format!("{container}: multiplier must be a non-negative number");
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }

                div { style: "margin-top: 16px; display: flex; gap: 8px; justify-content: flex-end;",
                    button {
                        onclick: move |_| {
                            store.write().cancel_staging();
                            paste_text.set(String::new());
                            *status.write() = "Import cancelled".to_string();
                        },
                        "Cancel"
                    }
                    button {
                        disabled: !can_commit,
                        onclick: move |_| {
                            let result = store.write().commit_staging();
                            match result {
                                Ok(_) => paste_text.set(String::new()),
                                Err(err) => *status.write() = format!("Import blocked: {err}"),
                            }
                        },
                        "Add Rows"
                    }
                }
            }
        }
    }
}

#[component]
pub fn App() -> Element {
    let settings = try_use_context::<AppSettings>().unwrap_or_default();

    let AppState {
        mut busy,
        mut status,
        paste_text,
        mut description,
        mut pricing_type,
        mut price_priority,
        mut facilities_text,
        mut generators_text,
        mut filter_inputs,
        mut validation_errors,
    } = AppState::new(&settings);

    let reference_fails = settings.reference_data_fails;
    let default_conversion = settings.default_conversion;
    let mut store = use_signal(move || {
        let provider = if reference_fails {
            MockReferenceData::failing()
        } else {
            MockReferenceData::default()
        };
        let reference = ReferenceService::new(Arc::new(provider)).load_or_empty();
        let mut store =
            GridStore::default().with_conversion(ConversionTable::for_kind(default_conversion));
        store.set_reference_data(reference);
        store.subscribe(move |event| match event {
            GridEvent::StagingCommitted(ids) => {
                *status.write() = format!("Added {} row(s)", ids.len());
            }
            GridEvent::RowDeleted(id) => {
                *status.write() = format!("Deleted row {id}");
            }
            GridEvent::ConversionReplaced(kind) => {
                log::debug!("active conversion table replaced ({kind:?})");
            }
            _ => {}
        });
        store
    });

    let submission_service = use_hook(|| {
        Arc::new(SubmissionService::new(Arc::new(
            MockPricingService::default(),
        )))
    });
    let import_service = ImportService::new();
    let confirm_row_delete = settings.confirm_row_delete;

    let build_context = move || SubmissionContext {
        header: PriceHeader {
            description: description(),
            pricing_type: pricing_type(),
            price_priority: price_priority(),
            ..PriceHeader::default()
        },
        facilities: split_list_input(&facilities_text()),
        generators: split_list_input(&generators_text()),
    };

    let snapshot = store.read();
    let columns: Vec<ColumnDefinition> = snapshot.columns().to_vec();
    let rows = row_views(&snapshot);
    let state = snapshot.state();
    let total_rows = snapshot.len();
    let visible_rows = snapshot.visible_len();
    let conversion_kind = snapshot.conversion().kind();
    let reference_missing = snapshot.reference().is_empty();
    let filter_labels: Vec<(FieldKey, &'static str)> = FILTER_COLUMNS
        .iter()
        .map(|key| {
            let label = column_for(&columns, *key)
                .map(|column| column.label)
                .unwrap_or(key.as_str());
            (*key, label)
        })
        .collect();
    drop(snapshot);

    let errors = validation_errors();

    rsx! {
        div {
            style: "font-family: sans-serif; padding: 12px; display: flex; flex-direction: column; gap: 10px;",

            div { style: "display: flex; gap: 10px; flex-wrap: wrap; align-items: center;",
                label { "Description "
                    input { value: description(), oninput: move |event| description.set(event.value()) }
                }
                label { "Pricing type "
                    input { style: "width: 110px;", value: pricing_type(), oninput: move |event| pricing_type.set(event.value()) }
                }
                label { "Priority "
                    input { style: "width: 50px;", value: price_priority(), oninput: move |event| price_priority.set(event.value()) }
                }
                label { "Facilities "
                    input { placeholder: "comma separated", value: facilities_text(), oninput: move |event| facilities_text.set(event.value()) }
                }
                label { "Generators "
                    input { placeholder: "comma separated", value: generators_text(), oninput: move |event| generators_text.set(event.value()) }
                }
            }

            div { style: "display: flex; gap: 8px; flex-wrap: wrap; align-items: center;",
                for (key, label) in filter_labels {
                    input {
                        style: "width: 120px;",
                        placeholder: "{label}",
                        value: filter_inputs.read().get(&key).cloned().unwrap_or_default(),
                        oninput: move |event| {
                            let text = event.value();
                            let needle = text.trim().to_string();
                            filter_inputs.write().insert(key, text);
                            if needle.is_empty() {
                                store.write().clear_filter(key);
                            } else {
                                store.write().apply_filter(key, FilterPredicate::Contains(needle));
                            }
                        }
                    }
                }
                button {
                    onclick: move |_| {
                        filter_inputs.write().clear();
                        store.write().clear_filters();
                    },
                    "Clear filters"
                }
            }

            div { style: "display: flex; gap: 8px; flex-wrap: wrap;",
                button {
                    disabled: busy(),
                    onclick: move |_| {
                        let seed = RowSeed::from([
                            (FieldKey::PricingType, pricing_type()),
                            (FieldKey::PricePriority, price_priority()),
                        ]);
                        let id = store.write().add_row_from_filters(seed);
                        *status.write() = format!("Added row {id}");
                    },
                    "Add Row"
                }
                button {
                    disabled: busy(),
                    onclick: move |_| {
                        let selected = store.read().selected_row_id();
                        let Some(id) = selected else {
                            *status.write() = "Select a cell in the row to delete".to_string();
                            return;
                        };
                        if confirm_row_delete {
                            let confirm = MessageDialog::new()
                                .set_level(MessageLevel::Warning)
                                .set_title("Delete row")
                                .set_description(format!("Delete row {id}?"))
                                .set_buttons(MessageButtons::YesNo)
                                .show();
                            if confirm != MessageDialogResult::Yes {
                                return;
                            }
                        }
                        store.write().delete_row(id);
                    },
                    "Delete Row"
                }
                button {
                    disabled: busy(),
                    onclick: move |_| {
                        store.write().stage_text("");
                    },
                    "Paste from Excel"
                }
                button {
                    disabled: busy(),
                    onclick: move |_| {
                        let Some(path) = FileDialog::new()
                            .add_filter("Spreadsheet", &IMPORT_EXTENSIONS)
                            .pick_file()
                        else {
                            return;
                        };
                        *busy.write() = true;
                        let result = import_service.stage_file(&mut store.write(), &path);
                        match result {
                            Ok(count) => {
                                *status.write() = format!("Staged {count} row(s) from {}", path.display());
                            }
                            Err(err) => {
                                log::warn!("file import failed: {err}");
                                MessageDialog::new()
                                    .set_level(MessageLevel::Error)
                                    .set_title("Import")
                                    .set_description(err.to_string())
                                    .set_buttons(MessageButtons::Ok)
                                    .show();
                                *status.write() = format!("Import failed: {err}");
                            }
                        }
                        *busy.write() = false;
                    },
                    "Import File"
                }
                button {
                    onclick: move |_| {
                        let text = store.read().copy_visible_as_tsv();
                        match serde_json::to_string(&text) {
                            Ok(literal) => {
                                let copy = document::eval(&format!(
                                    "await navigator.clipboard.writeText({literal}); return true;"
                                ));
                                *status.write() = "Copying visible rows...".to_string();
                                spawn(async move {
                                    match copy.await {
                                        Ok(_) => *status.write() = "Copied visible rows".to_string(),
                                        Err(err) => {
                                            log::warn!("clipboard write failed: {err:?}");
                                            *status.write() = format!("Copy failed: {err:?}");
                                        }
                                    }
                                });
                            }
                            Err(err) => *status.write() = format!("Copy failed: {err}"),
                        }
                    },
                    "Copy Visible"
                }
                span { style: "flex: 1;" }
                button {
                    disabled: busy(),
                    onclick: {
                        let submission_service = submission_service.clone();
                        move |_| {
                            let result = submission_service.save_draft(&store.read(), &build_context());
                            *status.write() = match result {
                                Ok(receipt) => format!("Draft saved as price header {}", receipt.price_header_id),
                                Err(err) => format!("Save failed: {err}"),
                            };
                        }
                    },
                    "Save Draft"
                }
                button {
                    disabled: busy(),
                    onclick: {
                        let submission_service = submission_service.clone();
                        move |_| {
                            let result = submission_service.validate(&store.read(), &build_context());
                            match result {
                                Ok(report) if report.is_valid => {
                                    validation_errors.set(Vec::new());
                                    *status.write() = "Validation passed".to_string();
                                }
                                Ok(report) => {
                                    *status.write() = format!("{} problem(s) found", report.errors.len());
                                    validation_errors.set(report.errors);
                                }
                                Err(err) => *status.write() = format!("Validation failed: {err}"),
                            }
                        }
                    },
                    "Validate"
                }
                button {
                    disabled: busy(),
                    onclick: {
                        let submission_service = submission_service.clone();
                        move |_| {
                            *busy.write() = true;
                            let result = submission_service.submit(&store.read(), &build_context());
                            match result {
                                Ok(receipt) => {
                                    validation_errors.set(Vec::new());
                                    *status.write() = format!("Submitted as price header {}", receipt.price_header_id);
                                }
                                Err(err) => *status.write() = format!("Submit failed: {err}"),
                            }
                            *busy.write() = false;
                        }
                    },
                    "Submit"
                }
            }

            if reference_missing {
                div { style: "color: #a15c00;", "Reference data is unavailable; dropdowns are empty." }
            }

            div {
                tabindex: "0",
                style: "overflow: auto; max-height: 70vh; border: 1px solid #ccc; outline: none;",
                onkeydown: move |event: KeyboardEvent| {
                    let Some(key) = nav_key(&event) else {
                        return;
                    };
                    let was_selected = matches!(store.read().state(), EditState::Selected(_));
                    let outcome = store.write().handle_key(key);
                    match (outcome, key) {
                        (KeyOutcome::Handled, _) => event.prevent_default(),
                        // Typing on a selected cell replaces its content.
                        // Typing on a selected text or number cell replaces its
                        // content. Other editors receive the key themselves.
                        (KeyOutcome::PassThrough, NavKey::Char(ch)) if was_selected => {
                            if store.write().commit_field(ch.to_string()) {
                                event.prevent_default();
                            }
                        }
                        _ => {}
                    }
                },
                table { style: "border-collapse: collapse; font-size: 13px;",
                    thead {
                        tr {
                            th { style: "position: sticky; top: 0; background: #f5f5f5; border: 1px solid #ddd; padding: 4px;", "#" }
                            for column in columns.iter() {
                                th {
                                    style: "position: sticky; top: 0; background: #f5f5f5; border: 1px solid #ddd; padding: 4px; min-width: {column.width.css_width()};",
                                    "{column.label}"
                                    if column.required {
                                        span { style: "color: #c62828;", " *" }
                                    }
                                }
                            }
                        }
                    }
                    tbody {
                        for (row_index, row) in rows.into_iter().enumerate() {
                            tr { key: "{row.id.0}",
                                td { style: "border: 1px solid #ddd; padding: 2px 4px; color: #888;", "{row.id.0}" }
                                for cell in row.cells {
                                    GridCell {
                                        store,
                                        row_id: row.id,
                                        position: CellPosition::new(row_index, cell.column.key),
                                        cell,
                                        state,
                                    }
                                }
                            }
                        }
                    }
                }
            }

            div { style: "display: flex; gap: 16px; color: #555; font-size: 13px;",
                span { "{status}" }
                span { "Rows: {visible_rows} / {total_rows}" }
                span { "Conversion: {conversion_kind:?}" }
                if busy() {
                    span { "Working..." }
                }
            }

            if !errors.is_empty() {
                ul { style: "color: #c62828; font-size: 13px;",
                    for error in errors {
                        li { "{error}" }
                    }
                }
            }

            ImportDialog { store, paste_text, status }
        }
    }
}
