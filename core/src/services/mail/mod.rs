//! Transactional mail: provider seam and message templates

mod composer;
mod traits;

pub use composer::MailComposer;
pub use traits::{MailMessage, MailServiceTrait};
