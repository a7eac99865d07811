//! One module per check.

pub mod borg;
pub mod borg_log;
pub mod directory;
pub mod disktemp;
pub mod mediawiki;
pub mod mysqldump;
pub mod omreport;
