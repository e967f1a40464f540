//! Mail adapter that records deliveries in the structured log.
//!
//! Stands in for a real delivery backend in development deployments; the
//! workflow treats every mailer as fire-and-forget, so swapping in an SMTP
//! implementation changes nothing upstream.

use async_trait::async_trait;
use tracing::info;

use crate::domain::EmailAddress;
use crate::domain::ports::{MailError, Mailer};

/// `Mailer` that logs instead of sending.
#[derive(Debug, Default, Clone)]
pub struct TracingMailer;

#[async_trait]
impl Mailer for TracingMailer {
    async fn send_verification(&self, to: &EmailAddress, token: &str) -> Result<(), MailError> {
        info!(to = %to, token, "verification mail dispatched");
        Ok(())
    }

    async fn send_invitation_notice(
        &self,
        to: &EmailAddress,
        trip_name: &str,
        sender_name: &str,
    ) -> Result<(), MailError> {
        info!(to = %to, trip = trip_name, sender = sender_name, "invitation mail dispatched");
        Ok(())
    }
}
