// Crate-internal.
// ---

pub(crate) mod data {
    pub(crate) mod datasources {
        pub(crate) mod ron_datasource;
        pub(crate) mod snapshot_json_datasource;
    }
    pub(crate) mod models {
        pub(crate) mod amount_model;
        pub(crate) mod iso_date_model;
        pub(crate) mod snapshot_model;
    }
    pub(crate) mod repositories {
        pub(crate) mod in_memory_snapshot_repository;
        pub(crate) mod json_file_snapshot_repository;
    }
}

pub(crate) mod domain {
    pub(crate) mod entities {
        pub(crate) mod collections;
        pub(crate) mod handlers;
        pub(crate) mod ledger_config;
        pub(crate) mod month_key;
        pub(crate) mod rent;
        pub(crate) mod room;
        pub(crate) mod room_layout;
        pub(crate) mod snapshot;
        pub(crate) mod tenant;
    }
    pub(crate) mod logic {
        pub(crate) mod collections_aggregator;
        pub(crate) mod layout_builder;
        pub(crate) mod occupancy_engine;
        pub(crate) mod period;
        pub(crate) mod rent_ledger;
    }
    pub(crate) mod repositories {
        pub(crate) mod snapshot_repository;
    }
    pub(crate) mod usecases {
        pub(crate) mod occupancy_usecase;
        pub(crate) mod report_usecase;
    }
}

pub(crate) mod presentation {
    pub(crate) mod csv_exporter;
    pub(crate) mod format;
}

// Public exports.
// ---

#[doc(hidden)]
#[allow(unused_imports)]
pub mod exports {
    // This mod represents how clients see the library, and can differ from the
    // internal structure.
    //
    // The contents of this mod are re-exported in the root of the crate.

    pub mod entities {
        pub use crate::domain::entities::collections::*;
        pub use crate::domain::entities::handlers::*;
        pub use crate::domain::entities::ledger_config::*;
        pub use crate::domain::entities::month_key::*;
        pub use crate::domain::entities::rent::*;
        pub use crate::domain::entities::room::*;
        pub use crate::domain::entities::room_layout::*;
        pub use crate::domain::entities::snapshot::*;
        pub use crate::domain::entities::tenant::*;
    }

    pub mod logic {
        pub use crate::domain::logic::collections_aggregator::*;
        pub use crate::domain::logic::occupancy_engine::*;
        pub use crate::domain::logic::period::*;
        pub use crate::domain::logic::rent_ledger::*;
    }

    pub mod repositories {
        pub use crate::data::repositories::in_memory_snapshot_repository::*;
        pub use crate::data::repositories::json_file_snapshot_repository::*;
        pub use crate::domain::repositories::snapshot_repository::*;
    }

    pub mod usecases {
        pub use crate::domain::usecases::occupancy_usecase::OccupancyUsecase;
        pub use crate::domain::usecases::report_usecase::ReportUsecase;
    }

    pub mod export {
        pub use crate::presentation::csv_exporter::{export_filename, generate_csv};
        pub use crate::presentation::format::*;
    }
}
