//! Parcel use-case service.
//!
//! # Responsibility
//! - Register parcels with a creation timestamp.
//! - Advance delivery status along the forward path only.
//! - Delegate guarded address changes and deletes to the repository.
//!
//! # Invariants
//! - Service APIs never bypass repository guards.
//! - `next_status` never moves a parcel backwards or past `delivered`.

use crate::model::parcel::{ClientId, Parcel, ParcelNumber, ParcelStatus};
use crate::repo::parcel_repo::{ParcelRepository, RepoError};
use chrono::{SecondsFormat, Utc};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug)]
pub enum ServiceError {
    Repo(RepoError),
    /// The parcel has no further status to advance to.
    FinalStatus {
        number: ParcelNumber,
        status: ParcelStatus,
    },
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::FinalStatus { number, status } => {
                write!(f, "parcel {number} cannot advance from status `{status}`")
            }
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::FinalStatus { .. } => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Use-case wrapper around a parcel repository.
pub struct ParcelService<R: ParcelRepository> {
    repo: R,
}

impl<R: ParcelRepository> ParcelService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Returns the wrapped repository, e.g. to close it.
    pub fn into_inner(self) -> R {
        self.repo
    }

    /// Registers a new parcel for `client`, stamped with the current UTC time.
    ///
    /// Returns the stored parcel including its assigned number.
    pub fn register(&self, client: ClientId, address: impl Into<String>) -> ServiceResult<Parcel> {
        let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let mut parcel = Parcel::new(client, address, created_at);
        parcel.number = self.repo.add(&parcel)?;

        info!(
            "event=parcel_register module=service status=ok number={} client={}",
            parcel.number, parcel.client
        );
        Ok(parcel)
    }

    pub fn client_parcels(&self, client: ClientId) -> ServiceResult<Vec<Parcel>> {
        Ok(self.repo.get_by_client(client)?)
    }

    /// Moves a parcel one step along `registered -> sent -> delivered`.
    ///
    /// # Errors
    /// - `FinalStatus` for delivered parcels and unknown statuses.
    /// - Repository errors unchanged, including no-rows for a missing number.
    pub fn next_status(&self, number: ParcelNumber) -> ServiceResult<ParcelStatus> {
        let parcel = self.repo.get(number)?;
        let Some(next) = parcel.status.next() else {
            return Err(ServiceError::FinalStatus {
                number,
                status: parcel.status,
            });
        };

        self.repo.set_status(number, &next)?;
        info!(
            "event=parcel_next_status module=service status=ok number={} from={} to={}",
            number, parcel.status, next
        );
        Ok(next)
    }

    pub fn change_address(&self, number: ParcelNumber, address: &str) -> ServiceResult<()> {
        Ok(self.repo.set_address(number, address)?)
    }

    pub fn delete(&self, number: ParcelNumber) -> ServiceResult<()> {
        Ok(self.repo.delete(number)?)
    }
}
