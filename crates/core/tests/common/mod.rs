//! Shared fixtures for the workflow integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use leavedesk_core::leave_type::LeaveType;
use leavedesk_core::memory::MemoryBackend;
use leavedesk_core::notify::LogNotifier;
use leavedesk_core::ports::{City, Employee, FixedClock, LeaveTypeStore, RequestStore};
use leavedesk_core::quota::QuotaService;
use leavedesk_core::workflow::{
    DateRange, LeaveDetails, LeaveRequest, LeaveWorkflow, NewLeaveRequest, NewTravelRequest,
    SubmissionPolicy, TimeOffRequest, TravelWorkflow,
};
use leavedesk_shared::types::{CityId, LeaveTypeId};

pub const YEAR: i32 = 2026;

pub fn day(month: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(YEAR, month, d).unwrap()
}

/// An org chart of one supervisor with two reports and an unrelated manager,
/// plus annual and unpaid leave types and two cities.
pub struct Harness {
    pub backend: MemoryBackend,
    pub leave: Arc<LeaveWorkflow>,
    pub travel: Arc<TravelWorkflow>,
    pub quota: QuotaService,
    pub supervisor: Employee,
    pub employee: Employee,
    pub teammate: Employee,
    pub other_manager: Employee,
    pub annual: LeaveType,
    pub unpaid: LeaveType,
    pub jakarta: City,
    pub closed_city: City,
}

fn leave_type(code: &str, consumes_quota: bool) -> LeaveType {
    let now = Utc::now();
    LeaveType {
        id: LeaveTypeId::new(),
        code: code.to_string(),
        name: format!("{code} leave"),
        description: None,
        min_duration_days: None,
        max_duration_days: Some(20),
        consumes_quota,
        is_paid: consumes_quota,
        requires_document: false,
        active: true,
        created_at: now,
        updated_at: now,
    }
}

impl Harness {
    /// Today is 1 March of the test year.
    pub async fn new() -> Self {
        Self::on(day(3, 1)).await
    }

    pub async fn on(today: NaiveDate) -> Self {
        Self::at(today.and_time(NaiveTime::MIN).and_utc()).await
    }

    pub async fn at(now: DateTime<Utc>) -> Self {
        let backend = MemoryBackend::new(12);

        let supervisor = Employee::new("Sari Wulandari", None);
        let mut employee = Employee::new("Dewi Lestari", Some(supervisor.id));
        employee.email = Some("dewi@example.com".into());
        let teammate = Employee::new("Agus Pratama", Some(supervisor.id));
        let other_manager = Employee::new("Bambang Setiawan", None);
        for e in [&supervisor, &employee, &teammate, &other_manager] {
            backend.directory.add_employee(e.clone());
        }

        let annual = leave_type("ANNUAL", true);
        let unpaid = leave_type("UNPAID", false);
        backend.leave_types.insert(annual.clone()).await.unwrap();
        backend.leave_types.insert(unpaid.clone()).await.unwrap();

        let jakarta = City {
            id: CityId::new(),
            name: "Jakarta".into(),
            province: "DKI Jakarta".into(),
            active: true,
        };
        let closed_city = City {
            id: CityId::new(),
            name: "Ambon".into(),
            province: "Maluku".into(),
            active: false,
        };
        backend.directory.add_city(jakarta.clone());
        backend.directory.add_city(closed_city.clone());

        let clock = Arc::new(FixedClock(now));
        let ctx = backend.context(
            clock.clone(),
            Arc::new(LogNotifier),
            SubmissionPolicy::default(),
        );

        Self {
            leave: Arc::new(LeaveWorkflow::new(&ctx)),
            travel: Arc::new(TravelWorkflow::new(&ctx)),
            quota: QuotaService::new(backend.ledger.clone(), backend.directory.clone(), clock),
            backend,
            supervisor,
            employee,
            teammate,
            other_manager,
            annual,
            unpaid,
            jakarta,
            closed_city,
        }
    }

    pub fn annual_leave(&self, start: NaiveDate, end: NaiveDate) -> NewLeaveRequest {
        NewLeaveRequest {
            employee_id: self.employee.id,
            leave_type_id: self.annual.id,
            start_date: start,
            end_date: end,
            total_days: None,
            reason: Some("Family visit".into()),
        }
    }

    pub fn trip(&self, start: NaiveDate, end: NaiveDate) -> NewTravelRequest {
        NewTravelRequest {
            employee_id: self.employee.id,
            city_id: self.jakarta.id,
            start_date: start,
            end_date: end,
            reason: Some("Client workshop".into()),
        }
    }

    /// Stores a pending annual-leave request as if it had been submitted at
    /// `created_at`, bypassing the clock.
    pub async fn backfill_leave(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        created_at: DateTime<Utc>,
    ) -> LeaveRequest {
        let period = DateRange::new(start, end).unwrap();
        let request = TimeOffRequest::submitted(
            self.employee.id,
            period,
            None,
            LeaveDetails {
                leave_type_id: self.annual.id,
                total_days: period.days(),
            },
            created_at,
        );
        self.backend.leave_requests.insert(request).await.unwrap()
    }

    pub async fn remaining(&self) -> u32 {
        self.quota
            .get_remaining(self.employee.id, Some(YEAR))
            .await
            .unwrap()
    }
}
