pub mod render;

pub use render::{
    display_dataset_summary, display_plan, display_report, report_json, write_report_json,
};
