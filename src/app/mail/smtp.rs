use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox, Message},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, Tokio1Executor,
};

use super::{EmailError, EmailMessage, EmailSender};

/// SMTP email sender for production use.
#[derive(Debug)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl SmtpMailer {
    /// Create a new SMTP mailer. Port 587 is the usual STARTTLS port;
    /// credentials are optional for servers that accept unauthenticated
    /// relay from the app host.
    pub fn new(
        host: String,
        port: u16,
        user: Option<String>,
        pass: Option<String>,
        from: String,
    ) -> Result<Self, EmailError> {
        let mut transport =
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&host).port(port);

        if let (Some(user), Some(pass)) = (user, pass) {
            transport = transport.credentials(Credentials::new(user, pass));
        }

        Ok(Self {
            transport: transport.build(),
            from,
        })
    }
}

#[async_trait]
impl EmailSender for SmtpMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), EmailError> {
        let from: Mailbox = self
            .from
            .parse()
            .map_err(|e| EmailError::Config(format!("Invalid from address '{}': {}", self.from, e)))?;

        let to: Mailbox = message
            .to
            .as_str()
            .parse()
            .map_err(|e| EmailError::Config(format!("Invalid to address '{}': {}", message.to, e)))?;

        let email = Message::builder()
            .from(from)
            .to(to)
            .subject(&message.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(message.body.clone())
            .map_err(|e| EmailError::Send(format!("Failed to build email message: {}", e)))?;

        lettre::AsyncTransport::send(&self.transport, email)
            .await
            .map(|_| ())
            .map_err(|e| EmailError::Smtp(format!("SMTP send failed: {}", e)))?;

        Ok(())
    }
}
