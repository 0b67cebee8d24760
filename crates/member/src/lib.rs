// Test code patterns (expected in test files):
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! HealthPlan Member Module
//!
//! Member-facing data around an existing contract.
//!
//! ## Features
//!
//! - **Contracts**: Active contract lookup and the free dependent allowance
//! - **Dependents**: Dependents registered under a contract, CPF masking
//! - **Schedules**: Waiting-room appointments with an optional date window

pub mod contracts;
pub mod dates;
pub mod dependents;
pub mod error;
pub mod schedules;

// Contracts
pub use contracts::{active_contract, can_add_dependent, DependentAllowance, MemberContract};

// Dates
pub use dates::{format_display, parse_day, parse_timestamp};

// Dependents
pub use dependents::{mask_cpf, Dependent, DependentService};

// Error
pub use error::{MemberError, MemberResult};

// Schedules
pub use schedules::{
    filter_by_date_range, sort_newest_first, waiting_schedules, PatientId, Schedule,
    ScheduleService,
};

use healthplan_shared::ApiClient;

/// Member data services sharing one backend client
#[derive(Debug, Clone)]
pub struct MemberService {
    pub dependents: DependentService,
    pub schedules: ScheduleService,
}

impl MemberService {
    pub fn new(client: ApiClient) -> Self {
        Self {
            dependents: DependentService::new(client.clone()),
            schedules: ScheduleService::new(client),
        }
    }
}
