pub mod app;

pub mod domain {
    pub mod entities {
        pub mod column;
        pub mod conversion;
        pub mod filter;
        pub mod grid;
        pub mod navigation;
        pub mod reference;
        pub mod request;
        pub mod row;
        pub mod staging;
    }
    pub mod validation;
}

pub mod usecase {
    pub mod ports {
        pub mod reference;
        pub mod submission;
    }
    pub mod services {
        pub mod grid_store;
        pub mod import_service;
        pub mod reference_service;
        pub mod submission_service;
    }
}

pub mod infra {
    pub mod config {
        pub mod settings;
    }
    pub mod import {
        pub mod clipboard;
        pub mod csv;
        pub mod xlsx;
    }
    pub mod mock {
        pub mod pricing_service;
        pub mod reference_data;
    }
    pub mod logging;
}

pub mod ui {
    pub mod state {
        pub mod app_state;
    }
}
