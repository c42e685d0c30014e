use std::collections::BTreeMap;

use dioxus::prelude::{use_signal, Signal};

use crate::domain::entities::row::FieldKey;
use crate::infra::config::settings::AppSettings;

pub struct AppState {
    pub busy: Signal<bool>,
    pub status: Signal<String>,
    pub paste_text: Signal<String>,
    pub description: Signal<String>,
    pub pricing_type: Signal<String>,
    pub price_priority: Signal<String>,
    pub facilities_text: Signal<String>,
    pub generators_text: Signal<String>,
    pub filter_inputs: Signal<BTreeMap<FieldKey, String>>,
    pub validation_errors: Signal<Vec<String>>,
}

impl AppState {
    pub fn new(settings: &AppSettings) -> Self {
        let pricing_type = settings.default_pricing_type.clone();
        let price_priority = settings.default_price_priority.clone();
        Self {
            busy: use_signal(|| false),
            status: use_signal(|| "Ready".to_string()),
            paste_text: use_signal(String::new),
            description: use_signal(String::new),
            pricing_type: use_signal(move || pricing_type),
            price_priority: use_signal(move || price_priority),
            facilities_text: use_signal(String::new),
            generators_text: use_signal(String::new),
            filter_inputs: use_signal(BTreeMap::<FieldKey, String>::new),
            validation_errors: use_signal(Vec::<String>::new),
        }
    }
}

/// Comma or newline separated list input.
pub fn split_list_input(text: &str) -> Vec<String> {
    text.split([',', '\n'])
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
