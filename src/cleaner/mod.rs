pub mod engine;
pub mod run_log;

pub use engine::{
    dry_run, execute, remove_dir_all, CleanMode, CleanReport, CleanupPlan, DeletionFailure,
    RemoveDir,
};
pub use run_log::{log_file_name, RunLog};
