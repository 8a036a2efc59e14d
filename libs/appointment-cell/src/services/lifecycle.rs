use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use shared_models::auth::{AuthUser, Role};
use shared_models::records::{ProfessionalRecord, UserRecord};
use shared_store::{next_id, Collection, JsonStore, StoreError};

use crate::models::{
    Appointment, AppointmentError, AppointmentKind, AppointmentStatus, AppointmentView,
    AttendanceRecord, ClinicalRecordEntry, CreateAppointmentRequest, DeleteOutcome,
    UpdateAppointmentRequest,
};
use crate::services::conflict::slot_taken;
use crate::services::notify::NotificationSink;

/// The scheduling state machine: SCHEDULED -> {COMPLETED, CANCELED}, plus
/// deletion of anything not COMPLETED. Owns appointment, attendance and
/// clinical-record creation; reads the user and professional directories
/// for display names only.
pub struct AppointmentLifecycleService<'a> {
    store: &'a JsonStore,
}

impl<'a> AppointmentLifecycleService<'a> {
    pub fn new(store: &'a JsonStore) -> Self {
        Self { store }
    }

    fn sink(&self) -> NotificationSink<'a> {
        NotificationSink::new(self.store)
    }

    /// Appointments visible to the caller: patients and professionals see
    /// their own, admins see everything.
    pub async fn list_for(&self, user: &AuthUser) -> Vec<AppointmentView> {
        let appointments: Vec<Appointment> = self.store.load(Collection::Appointments).await;

        let visible: Vec<Appointment> = match user.role {
            Role::Patient => appointments
                .into_iter()
                .filter(|a| a.patient_id == user.id)
                .collect(),
            Role::Professional => appointments
                .into_iter()
                .filter(|a| a.professional_id == user.id)
                .collect(),
            Role::Admin => appointments,
        };

        self.enrich(visible).await
    }

    /// A single patient's appointments, for the patient consultation view.
    pub async fn list_for_patient(&self, patient_id: u64) -> Vec<AppointmentView> {
        let appointments: Vec<Appointment> = self.store.load(Collection::Appointments).await;
        let own = appointments
            .into_iter()
            .filter(|a| a.patient_id == patient_id)
            .collect();
        self.enrich(own).await
    }

    async fn enrich(&self, appointments: Vec<Appointment>) -> Vec<AppointmentView> {
        let users: Vec<UserRecord> = self.store.load(Collection::Users).await;
        let professionals: Vec<ProfessionalRecord> = self.store.load(Collection::Professionals).await;

        appointments
            .into_iter()
            .map(|appointment| {
                let patient_name = users
                    .iter()
                    .find(|u| u.id == appointment.patient_id)
                    .map(|u| u.name.clone());
                let professional_name = professionals
                    .iter()
                    .find(|p| p.id == appointment.professional_id)
                    .map(|p| p.name.clone());
                AppointmentView {
                    appointment,
                    patient_name,
                    professional_name,
                }
            })
            .collect()
    }

    /// Schedule a new appointment. Check order is load-bearing: conflict
    /// (409) before patient resolution (400) before the professional
    /// self-booking rule (403).
    pub async fn create(
        &self,
        user: &AuthUser,
        request: CreateAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        let professional_id = request
            .professional_id
            .ok_or(AppointmentError::MissingField("professional_id"))?;
        let scheduled_at = request
            .scheduled_at
            .ok_or(AppointmentError::MissingField("scheduled_at"))?;
        let kind = request.kind.ok_or(AppointmentError::MissingField("kind"))?;

        let user = *user;
        let appointment = self
            .store
            .update(Collection::Appointments, move |appointments: &mut Vec<Appointment>| {
                if slot_taken(appointments, professional_id, scheduled_at, None) {
                    return Err(AppointmentError::SlotTaken);
                }

                let patient_id = if user.is_patient() {
                    user.id
                } else {
                    request.patient_id.ok_or(AppointmentError::PatientRequired)?
                };

                if user.is_professional() && professional_id != user.id {
                    return Err(AppointmentError::NotYourCalendar);
                }

                let id = next_id(appointments.iter().map(|a| a.id));
                let remote_link = match kind {
                    AppointmentKind::Remote => Appointment::remote_link_for(id),
                    AppointmentKind::InPerson => String::new(),
                };

                let appointment = Appointment {
                    id,
                    patient_id,
                    professional_id,
                    scheduled_at,
                    status: AppointmentStatus::Scheduled,
                    kind,
                    remote_link,
                    created_at: Utc::now(),
                    created_by: user.id,
                };
                appointments.push(appointment.clone());
                Ok(appointment)
            })
            .await
            .map_err(store_error)??;

        debug!("Appointment {} scheduled for professional {}", appointment.id, professional_id);

        self.sink()
            .notify(
                appointment.patient_id,
                format!("Consulta agendada para {}", format_instant(scheduled_at)),
            )
            .await
            .map_err(store_error)?;

        Ok(appointment)
    }

    /// Reschedule and/or change status. The ownership check is permissive
    /// by design: supplying `patient_id` (or `professional_id`) in the body
    /// bypasses the ownership test, yet neither field is ever written back.
    /// Unknown status strings are ignored.
    pub async fn update(
        &self,
        user: &AuthUser,
        id: u64,
        request: UpdateAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        let user = *user;
        let (appointment, notifications) = self
            .store
            .update(Collection::Appointments, move |appointments: &mut Vec<Appointment>| {
                let index = appointments
                    .iter()
                    .position(|a| a.id == id)
                    .ok_or(AppointmentError::NotFound)?;
                let current = appointments[index].clone();

                if user.is_patient() && current.patient_id != user.id && request.patient_id.is_none() {
                    return Err(AppointmentError::Forbidden);
                }
                if user.is_professional()
                    && current.professional_id != user.id
                    && request.professional_id.is_none()
                {
                    return Err(AppointmentError::Forbidden);
                }

                let mut notifications: Vec<(u64, String)> = Vec::new();

                if let Some(new_time) = request.scheduled_at {
                    if slot_taken(appointments, current.professional_id, new_time, Some(id)) {
                        return Err(AppointmentError::SlotTaken);
                    }
                    appointments[index].scheduled_at = new_time;
                    notifications.push((
                        current.patient_id,
                        format!("Consulta reagendada para {}", format_instant(new_time)),
                    ));
                }

                if let Some(raw_status) = request.status.as_deref() {
                    match raw_status.parse::<AppointmentStatus>() {
                        Ok(new_status) => {
                            appointments[index].status = new_status;
                            if new_status == AppointmentStatus::Canceled {
                                notifications
                                    .push((current.patient_id, "Consulta cancelada".to_string()));
                            }
                        }
                        Err(()) => {
                            warn!("Ignoring unrecognized appointment status '{}'", raw_status);
                        }
                    }
                }

                Ok((appointments[index].clone(), notifications))
            })
            .await
            .map_err(store_error)??;

        let sink = self.sink();
        for (recipient, message) in notifications {
            sink.notify(recipient, message).await.map_err(store_error)?;
        }

        Ok(appointment)
    }

    /// Remove an appointment outright. COMPLETED records are permanently
    /// protected; the outcome carries the rule that authorized the removal.
    pub async fn delete(&self, user: &AuthUser, id: u64) -> Result<DeleteOutcome, AppointmentError> {
        let user = *user;
        let outcome = self
            .store
            .update(Collection::Appointments, move |appointments: &mut Vec<Appointment>| {
                let index = appointments
                    .iter()
                    .position(|a| a.id == id)
                    .ok_or(AppointmentError::NotFound)?;
                let appointment = appointments[index].clone();

                let reason = if user.is_admin() {
                    "Admin role grants full access"
                } else if user.is_professional() && appointment.professional_id == user.id {
                    "Professionals may delete their own appointments"
                } else if user.is_patient() && appointment.patient_id == user.id {
                    "Patients may delete their own appointments"
                } else {
                    return Err(AppointmentError::Forbidden);
                };

                if appointment.status == AppointmentStatus::Completed {
                    return Err(AppointmentError::CompletedImmutable);
                }

                appointments.remove(index);
                Ok(DeleteOutcome {
                    appointment,
                    reason: reason.to_string(),
                })
            })
            .await
            .map_err(store_error)??;

        let sink = self.sink();
        sink.notify(
            outcome.appointment.patient_id,
            format!(
                "Consulta do dia {} foi removida do sistema",
                format_instant(outcome.appointment.scheduled_at)
            ),
        )
        .await
        .map_err(store_error)?;

        sink.notify(
            outcome.appointment.professional_id,
            format!("Consulta com {} foi removida", outcome.appointment.patient_id),
        )
        .await
        .map_err(store_error)?;

        Ok(outcome)
    }

    /// Complete a SCHEDULED appointment: flips the status, writes one
    /// attendance and one clinical-record entry with the same notes and
    /// timestamp, and notifies the patient.
    pub async fn complete(
        &self,
        user: &AuthUser,
        id: u64,
        notes: String,
    ) -> Result<AttendanceRecord, AppointmentError> {
        let user = *user;
        let appointment = self
            .store
            .update(Collection::Appointments, move |appointments: &mut Vec<Appointment>| {
                let index = appointments
                    .iter()
                    .position(|a| a.id == id)
                    .ok_or(AppointmentError::NotFound)?;

                if appointments[index].professional_id != user.id {
                    return Err(AppointmentError::NotYourAppointment);
                }
                if appointments[index].status != AppointmentStatus::Scheduled {
                    return Err(AppointmentError::NotScheduled);
                }

                appointments[index].status = AppointmentStatus::Completed;
                Ok(appointments[index].clone())
            })
            .await
            .map_err(store_error)??;

        let timestamp = Utc::now();
        let attendance = AttendanceRecord {
            appointment_id: appointment.id,
            professional_id: appointment.professional_id,
            patient_id: appointment.patient_id,
            timestamp,
            notes: notes.clone(),
        };

        let record = attendance.clone();
        self.store
            .update(Collection::Attendances, move |items: &mut Vec<AttendanceRecord>| {
                items.push(record);
            })
            .await
            .map_err(store_error)?;

        let entry = ClinicalRecordEntry {
            patient_id: appointment.patient_id,
            timestamp,
            description: notes,
            professional_id: appointment.professional_id,
            appointment_id: appointment.id,
        };
        self.store
            .update(Collection::Records, move |items: &mut Vec<ClinicalRecordEntry>| {
                items.push(entry);
            })
            .await
            .map_err(store_error)?;

        self.sink()
            .notify(appointment.patient_id, "Atendimento realizado")
            .await
            .map_err(store_error)?;

        Ok(attendance)
    }
}

fn store_error(err: StoreError) -> AppointmentError {
    AppointmentError::Store(err.to_string())
}

fn format_instant(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}
