use crate::app::config::Config;
use crate::app::domain::Email;
use crate::app::mail::EmailMessage;

/// The notification kinds this backend sends. Each kind selects its own
/// subject and body template, keyed on the variant the way the mail service
/// switches on mail type.
#[derive(Debug, Clone)]
pub enum Notification {
    /// A user was invited into a workspace.
    WorkspaceInvite {
        org_name: String,
        invited_by: String,
        token: String,
    },
    /// Workspace ownership moved to this user.
    OwnershipTransfer { org_name: String },
}

impl Notification {
    /// Render this notification into a sendable message.
    pub fn into_message(self, to: Email, config: &Config) -> EmailMessage {
        let (subject, body) = match self {
            Notification::WorkspaceInvite {
                org_name,
                invited_by,
                token,
            } => (
                format!("You have been invited to join {}", org_name),
                format!(
                    "{invited_by} invited you to join the {org_name} workspace.\n\n\
                     Accept the invitation here:\n{base}/invites/accept?token={token}\n\n\
                     The invitation expires in 7 days.",
                    base = config.app_url_base(),
                ),
            ),
            Notification::OwnershipTransfer { org_name } => (
                format!("You are now the owner of {}", org_name),
                format!(
                    "Ownership of the {org_name} workspace has been transferred to you.\n\
                     You now hold the owner role and can manage members, billing, and settings."
                ),
            ),
        };

        EmailMessage {
            to,
            subject,
            body,
            from: config.mail_from.clone(),
        }
    }
}
