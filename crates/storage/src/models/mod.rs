mod participation;
mod prize;
mod ranking;
mod registration;
mod settings;
mod share;
mod winner;

pub use participation::{Participation, Restaurant, ValidationStatus};
pub use prize::Prize;
pub use ranking::{RankedUser, RankingEntry, UserSummary};
pub use registration::{Registration, UtmParams};
pub use settings::SiteSettings;
pub use share::{SHARE_CONFIG_ID, ShareConfig, ShareEvent, ShareMeta};
pub use winner::Winner;
