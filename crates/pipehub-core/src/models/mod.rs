//! Account entities and their field-level edits

mod channel;
mod edit;
mod profile;

pub use channel::NotificationChannel;
pub use edit::{
    coerce_agent_id, coerce_flag, coerce_text, ChannelEdit, ChannelField, ProfileEdit,
    ProfileField,
};
pub use profile::UserProfile;
