use chrono::{DateTime, Utc};

use crate::models::{Appointment, AppointmentStatus};

/// Scheduling invariant: at most one SCHEDULED appointment per
/// `(professional_id, scheduled_at)` pair. Pass the record's own id in
/// `exclude_id` when re-checking during a reschedule.
pub fn slot_taken(
    appointments: &[Appointment],
    professional_id: u64,
    scheduled_at: DateTime<Utc>,
    exclude_id: Option<u64>,
) -> bool {
    appointments.iter().any(|a| {
        a.professional_id == professional_id
            && a.scheduled_at == scheduled_at
            && a.status == AppointmentStatus::Scheduled
            && exclude_id.map_or(true, |id| a.id != id)
    })
}
