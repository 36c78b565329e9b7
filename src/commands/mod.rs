mod backup_cmd;
mod config_cmd;
mod diary;
mod profile;
mod routine;
mod sync_cmd;
mod weight;

pub use backup_cmd::BackupCommand;
pub use config_cmd::ConfigCommand;
pub use diary::DiaryCommand;
pub use profile::ProfileCommand;
pub use routine::RoutineCommand;
pub use sync_cmd::SyncCommand;
pub use weight::WeightCommand;
