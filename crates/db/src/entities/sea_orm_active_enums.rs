//! Postgres enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use leavedesk_core::workflow::{RequestKind as DomainKind, RequestStatus as DomainStatus};

/// `request_kind` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "request_kind")]
pub enum RequestKind {
    /// Leave request.
    #[sea_orm(string_value = "leave")]
    Leave,
    /// Business-travel request.
    #[sea_orm(string_value = "business_travel")]
    BusinessTravel,
}

/// `request_status` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "request_status")]
pub enum RequestStatus {
    /// Awaiting a decision.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Approved by the direct supervisor.
    #[sea_orm(string_value = "approved")]
    Approved,
    /// Rejected by the direct supervisor.
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl From<DomainKind> for RequestKind {
    fn from(kind: DomainKind) -> Self {
        match kind {
            DomainKind::Leave => Self::Leave,
            DomainKind::BusinessTravel => Self::BusinessTravel,
        }
    }
}

impl From<DomainStatus> for RequestStatus {
    fn from(status: DomainStatus) -> Self {
        match status {
            DomainStatus::Pending => Self::Pending,
            DomainStatus::Approved => Self::Approved,
            DomainStatus::Rejected => Self::Rejected,
        }
    }
}

impl From<RequestStatus> for DomainStatus {
    fn from(status: RequestStatus) -> Self {
        match status {
            RequestStatus::Pending => Self::Pending,
            RequestStatus::Approved => Self::Approved,
            RequestStatus::Rejected => Self::Rejected,
        }
    }
}
