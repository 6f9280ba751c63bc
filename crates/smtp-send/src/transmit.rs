//! Message transmitter: one SMTP transaction over an open session.

use crate::error::SendError;
use smtp_send_client::{Address, Client, Connected};
use tokio::io::AsyncRead;
use tracing::{debug, info, warn};

/// Header values written ahead of the body.
///
/// Values are written verbatim; an empty value still produces its header
/// line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Headers<'a> {
    /// `From:` value, also the envelope sender.
    pub from: &'a str,
    /// `To:` value, also the envelope recipient.
    pub to: &'a str,
    /// `Subject:` value.
    pub subject: &'a str,
}

impl Headers<'_> {
    /// Renders the header block, including the blank line that ends it.
    #[must_use]
    pub fn render(&self) -> String {
        format!(
            "From: {}\r\nTo: {}\r\nSubject: {}\r\n\r\n",
            self.from, self.to, self.subject
        )
    }
}

/// Sends one message and ends the session.
///
/// MAIL FROM uses `headers.from` and RCPT TO uses `headers.to`. The body is
/// copied from `body` until end of input. Any failure aborts the transaction
/// without further commands; a failing QUIT is only logged. Returns the
/// number of body bytes sent.
///
/// # Errors
///
/// Returns the stage that failed: MAIL, RCPT, DATA, or sending the body
/// (headers, body, and closing the data section).
pub async fn transmit<R>(
    client: Client<Connected>,
    headers: &Headers<'_>,
    body: &mut R,
) -> Result<u64, SendError>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let from = Address::new(headers.from).map_err(SendError::Mail)?;
    let client = client.mail_from(from).await.map_err(SendError::Mail)?;

    let to = Address::new(headers.to).map_err(SendError::Rcpt)?;
    let client = client.rcpt_to(to).await.map_err(SendError::Rcpt)?;

    let mut client = client.data().await.map_err(SendError::Data)?;

    client
        .write(headers.render().as_bytes())
        .await
        .map_err(SendError::Body)?;
    let sent = client.copy_from(body).await.map_err(SendError::Body)?;
    debug!(bytes = sent, "body streamed");

    let client = client.finish().await.map_err(SendError::Body)?;
    info!(to = headers.to, bytes = sent, "message sent");

    if let Err(err) = client.quit().await {
        warn!(error = %err, "QUIT failed after message was accepted");
    }

    Ok(sent)
}
