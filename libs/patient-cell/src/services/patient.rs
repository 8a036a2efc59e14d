use chrono::Utc;
use tracing::debug;

use shared_models::auth::Role;
use shared_models::records::{find_user_by_email, PatientRecord, UserRecord};
use shared_store::{next_id, Collection, JsonStore, StoreError};
use shared_utils::password::hash_password;

use crate::models::{CreatePatientRequest, PatientError, PatientSummary, UpdatePatientRequest};

pub struct PatientService<'a> {
    store: &'a JsonStore,
}

impl<'a> PatientService<'a> {
    pub fn new(store: &'a JsonStore) -> Self {
        Self { store }
    }

    /// All patient profiles joined with their user accounts. Profiles whose
    /// account vanished are skipped rather than failing the listing.
    pub async fn list_patients(&self) -> Vec<PatientSummary> {
        let patients: Vec<PatientRecord> = self.store.load(Collection::Patients).await;
        let users: Vec<UserRecord> = self.store.load(Collection::Users).await;

        patients
            .into_iter()
            .filter_map(|profile| {
                let user = users.iter().find(|u| u.id == profile.id)?;
                Some(PatientSummary {
                    id: profile.id,
                    name: user.name.clone(),
                    email: user.email.clone(),
                    phone: profile.phone,
                    birth_date: profile.birth_date,
                    address: profile.address,
                    created_at: profile.created_at,
                })
            })
            .collect()
    }

    /// Create a PATIENT account plus its profile.
    pub async fn create_patient(
        &self,
        request: CreatePatientRequest,
    ) -> Result<PatientSummary, PatientError> {
        let name = request.name.ok_or(PatientError::MissingField("name"))?;
        let email = request.email.ok_or(PatientError::MissingField("email"))?;
        let password = request.password.ok_or(PatientError::MissingField("password"))?;
        let phone = request.phone.ok_or(PatientError::MissingField("phone"))?;

        let password_hash = hash_password(&password).map_err(PatientError::Store)?;
        let created_at = Utc::now();

        let user = {
            let name = name.clone();
            let email = email.clone();
            self.store
                .update(Collection::Users, move |users: &mut Vec<UserRecord>| {
                    if find_user_by_email(users, &email).is_some() {
                        return Err(PatientError::EmailTaken);
                    }
                    let id = next_id(users.iter().map(|u| u.id));
                    let user = UserRecord {
                        id,
                        name,
                        email,
                        password_hash,
                        role: Role::Patient,
                        created_at,
                    };
                    users.push(user.clone());
                    Ok(user)
                })
                .await
                .map_err(store_error)??
        };

        let profile = PatientRecord {
            id: user.id,
            phone: phone.clone(),
            birth_date: request.birth_date.unwrap_or_default(),
            address: request.address.unwrap_or_else(|| serde_json::json!({})),
            created_at,
        };
        let stored = profile.clone();
        self.store
            .update(Collection::Patients, move |patients: &mut Vec<PatientRecord>| {
                patients.push(stored);
            })
            .await
            .map_err(store_error)?;

        debug!("Created patient {} ({})", user.id, user.email);

        Ok(PatientSummary {
            id: user.id,
            name: user.name,
            email: user.email,
            phone,
            birth_date: profile.birth_date,
            address: profile.address,
            created_at,
        })
    }

    pub async fn get_patient(&self, patient_id: u64) -> Result<PatientSummary, PatientError> {
        let patients: Vec<PatientRecord> = self.store.load(Collection::Patients).await;
        let profile = patients
            .into_iter()
            .find(|p| p.id == patient_id)
            .ok_or(PatientError::NotFound)?;

        let users: Vec<UserRecord> = self.store.load(Collection::Users).await;
        let user = users.iter().find(|u| u.id == patient_id);

        Ok(PatientSummary {
            id: profile.id,
            name: user.map(|u| u.name.clone()).unwrap_or_default(),
            email: user.map(|u| u.email.clone()).unwrap_or_default(),
            phone: profile.phone,
            birth_date: profile.birth_date,
            address: profile.address,
            created_at: profile.created_at,
        })
    }

    /// Partial update of the profile and, when requested, the user account.
    /// A changed email is re-checked for uniqueness.
    pub async fn update_patient(
        &self,
        patient_id: u64,
        request: UpdatePatientRequest,
    ) -> Result<(), PatientError> {
        self.store
            .update(Collection::Patients, {
                let request = request.clone();
                move |patients: &mut Vec<PatientRecord>| {
                    let profile = patients
                        .iter_mut()
                        .find(|p| p.id == patient_id)
                        .ok_or(PatientError::NotFound)?;
                    if let Some(phone) = request.phone {
                        profile.phone = phone;
                    }
                    if let Some(birth_date) = request.birth_date {
                        profile.birth_date = birth_date;
                    }
                    if let Some(address) = request.address {
                        profile.address = address;
                    }
                    Ok(())
                }
            })
            .await
            .map_err(store_error)??;

        if request.name.is_some() || request.email.is_some() {
            self.store
                .update(Collection::Users, move |users: &mut Vec<UserRecord>| {
                    let taken = request.email.as_ref().is_some_and(|email| {
                        users.iter().any(|u| u.id != patient_id && &u.email == email)
                    });
                    if taken {
                        return Err(PatientError::EmailTaken);
                    }
                    let Some(user) = users.iter_mut().find(|u| u.id == patient_id) else {
                        return Ok(());
                    };
                    if let Some(name) = request.name {
                        user.name = name;
                    }
                    if let Some(email) = request.email {
                        user.email = email;
                    }
                    Ok(())
                })
                .await
                .map_err(store_error)??;
        }

        Ok(())
    }
}

fn store_error(err: StoreError) -> PatientError {
    PatientError::Store(err.to_string())
}
