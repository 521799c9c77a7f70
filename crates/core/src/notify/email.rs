//! SMTP delivery of decision events.

use std::sync::Arc;

use async_trait::async_trait;
use leavedesk_shared::EmailService;

use super::{DecisionEvent, NotificationSink, NotifyError};
use crate::ports::EmployeeDirectory;

/// Emails the requester, looking the address up in the directory.
#[derive(Clone)]
pub struct EmailNotifier {
    email: EmailService,
    directory: Arc<dyn EmployeeDirectory>,
}

impl EmailNotifier {
    /// Creates a new email notifier.
    #[must_use]
    pub fn new(email: EmailService, directory: Arc<dyn EmployeeDirectory>) -> Self {
        Self { email, directory }
    }
}

#[async_trait]
impl NotificationSink for EmailNotifier {
    async fn notify(&self, event: &DecisionEvent) -> Result<(), NotifyError> {
        let address = self
            .directory
            .find_by_id(event.employee_id)
            .await
            .map_err(|e| NotifyError::Delivery(e.to_string()))?
            .and_then(|employee| employee.email)
            .ok_or(NotifyError::NoRecipient(event.employee_id))?;

        self.email
            .send_email(&address, &event.subject(), &event.body())
            .await
            .map_err(|e| NotifyError::Delivery(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use leavedesk_shared::EmailConfig;
    use leavedesk_shared::types::{EmployeeId, RequestId};

    use crate::memory::MemoryDirectory;
    use crate::ports::Employee;
    use crate::workflow::types::{DateRange, RequestKind, RequestStatus};

    #[tokio::test]
    async fn test_missing_address_is_reported() {
        let directory = Arc::new(MemoryDirectory::new());
        let employee = Employee::new("No Mail", None);
        directory.add_employee(employee.clone());
        let notifier = EmailNotifier::new(EmailService::new(EmailConfig::default()), directory);

        let day = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let event = DecisionEvent {
            kind: RequestKind::Leave,
            request_id: RequestId::new(),
            employee_id: employee.id,
            decided_by: EmployeeId::new(),
            status: RequestStatus::Approved,
            period: DateRange::new(day, day).unwrap(),
            message: None,
        };

        let err = notifier.notify(&event).await.unwrap_err();
        assert!(matches!(err, NotifyError::NoRecipient(id) if id == employee.id));
    }
}
