//! Comet registry: comets and their perihelion passages.

use sea_orm::{DatabaseConnection, DbErr, SqlErr, TransactionTrait};

use crate::{
    model::comet::{CometDto, CometSummaryDto, FlybyDto, NewFlybyDto, RegisterCometDto},
    server::{
        data::{
            comet::CometRepository, flyby::FlybyRepository, summary::SummaryRepository,
        },
        error::{comet::CometError, Error},
        model::db::{CometModel, FlybyModel},
        service::{
            change::{ChangeFeed, StoreChange},
            index::SummaryIndexer,
            window::build_windows,
            workspace::CometView,
        },
    },
};

const MAX_DESIGNATION_LENGTH: usize = 64;
const J2000_JULIAN_DAY: f64 = 2_451_545.0;
const DAYS_PER_JULIAN_YEAR: f64 = 365.25;

/// Prefixes of non-numbered designations (`C/2020 F3`, `P/2019 LD2`, ...).
const DESIGNATION_PREFIXES: [&str; 6] = ["C/", "P/", "D/", "X/", "I/", "A/"];

/// Validates and trims a NASA comet designation.
///
/// Accepted forms are a periodic number followed by `P/` or `D/` (`1P/Halley`, `3D/Biela`)
/// or one of the provisional prefixes followed by a non-empty remainder.
pub fn normalize_designation(designation: &str) -> Result<String, CometError> {
    let trimmed = designation.trim();
    let invalid = || CometError::InvalidDesignation(designation.to_string());

    if trimmed.is_empty() || trimmed.chars().count() > MAX_DESIGNATION_LENGTH {
        return Err(invalid());
    }

    let digits = trimmed.chars().take_while(char::is_ascii_digit).count();
    let rest = &trimmed[digits..];

    let remainder = if digits > 0 {
        rest.strip_prefix("P/").or_else(|| rest.strip_prefix("D/"))
    } else {
        DESIGNATION_PREFIXES
            .iter()
            .find_map(|prefix| trimmed.strip_prefix(prefix))
    };

    match remainder {
        Some(remainder) if !remainder.trim().is_empty() => Ok(trimmed.to_string()),
        _ => Err(invalid()),
    }
}

/// Converts a Julian Day to a fractional Gregorian year.
pub fn julian_day_to_year(julian_day: f64) -> f64 {
    2000.0 + (julian_day - J2000_JULIAN_DAY) / DAYS_PER_JULIAN_YEAR
}

/// Year of a new flyby, from either its year or its Julian Day. Both absent means unknown.
pub fn flyby_year(flyby: &NewFlybyDto) -> Result<Option<f64>, CometError> {
    let year = match (flyby.year, flyby.julian_day) {
        (Some(_), Some(_)) => {
            return Err(CometError::InvalidFlyby(
                "give either a year or a Julian Day, not both".to_string(),
            ))
        }
        (Some(year), None) => Some(year),
        (None, Some(julian_day)) => Some(julian_day_to_year(julian_day)),
        (None, None) => None,
    };

    match year {
        Some(year) if !year.is_finite() => Err(CometError::InvalidFlyby(
            "flyby date must be a finite number".to_string(),
        )),
        year => Ok(year),
    }
}

/// Maps a unique violation on insert to a designation conflict.
///
/// Covers a concurrent registration committing between the lookup and the insert.
fn designation_conflict(err: DbErr, designation: &str) -> Error {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            CometError::DuplicateDesignation(designation.to_string()).into()
        }
        _ => err.into(),
    }
}

pub(crate) fn flyby_dto(flyby: &FlybyModel) -> FlybyDto {
    FlybyDto {
        id: flyby.id,
        year: flyby.year,
        description: flyby.description.clone(),
    }
}

fn comet_dto(comet: CometModel, flybys: &[FlybyModel]) -> CometDto {
    CometDto {
        id: comet.id,
        designation: comet.designation,
        name: comet.name,
        flybys: flybys.iter().map(flyby_dto).collect(),
        created_at: comet.created_at,
    }
}

/// Service for registering comets and recording their flybys.
pub struct CometService<'a> {
    db: &'a DatabaseConnection,
    changes: &'a ChangeFeed,
}

impl<'a> CometService<'a> {
    pub fn new(db: &'a DatabaseConnection, changes: &'a ChangeFeed) -> Self {
        Self { db, changes }
    }

    /// Registers a comet together with its initial flybys in one transaction.
    ///
    /// # Returns
    /// - `Ok(CometDto)` - Registered comet with its flybys
    /// - `Err(Error::CometError(InvalidDesignation | InvalidFlyby))` - Input rejected before any write
    /// - `Err(Error::CometError(DuplicateDesignation))` - Designation already registered
    /// - `Err(Error::DbErr)` - Database operation failed, nothing was written
    pub async fn register(&self, comet: RegisterCometDto) -> Result<CometDto, Error> {
        let designation = normalize_designation(&comet.designation)?;
        let flybys = comet
            .flybys
            .iter()
            .map(|flyby| Ok((flyby_year(flyby)?, flyby.description.clone())))
            .collect::<Result<Vec<_>, CometError>>()?;

        if CometRepository::new(self.db)
            .find_by_designation(&designation)
            .await?
            .is_some()
        {
            return Err(CometError::DuplicateDesignation(designation).into());
        }

        let txn = self.db.begin().await?;

        let created = CometRepository::new(&txn)
            .create(
                designation.clone(),
                comet.name.filter(|name| !name.trim().is_empty()),
            )
            .await
            .map_err(|err| designation_conflict(err, &designation))?;

        let flyby_repo = FlybyRepository::new(&txn);
        let mut created_flybys = Vec::with_capacity(flybys.len());
        for (year, description) in flybys {
            created_flybys.push(flyby_repo.create(created.id, year, description).await?);
        }

        txn.commit().await?;

        tracing::info!(
            comet_id = created.id,
            designation = %created.designation,
            flybys = created_flybys.len(),
            "Registered comet"
        );
        self.changes.publish(StoreChange::CometRegistered {
            comet_id: created.id,
        });

        Ok(comet_dto(created, &created_flybys))
    }

    /// Records a perihelion passage of an existing comet.
    pub async fn add_flyby(&self, comet_id: i32, flyby: NewFlybyDto) -> Result<FlybyDto, Error> {
        let year = flyby_year(&flyby)?;

        if CometRepository::new(self.db)
            .find_by_id(comet_id)
            .await?
            .is_none()
        {
            return Err(CometError::CometNotFound(comet_id).into());
        }

        let created = FlybyRepository::new(self.db)
            .create(comet_id, year, flyby.description)
            .await?;

        tracing::info!(comet_id, flyby_id = created.id, year = ?created.year, "Added flyby");
        self.changes.publish(StoreChange::FlybyAdded {
            comet_id,
            flyby_id: created.id,
        });

        Ok(flyby_dto(&created))
    }

    pub async fn get(&self, comet_id: i32) -> Result<CometDto, Error> {
        let comet = CometRepository::new(self.db)
            .find_by_id(comet_id)
            .await?
            .ok_or(CometError::CometNotFound(comet_id))?;
        let flybys = FlybyRepository::new(self.db).list_by_comet(comet_id).await?;

        Ok(comet_dto(comet, &flybys))
    }

    pub async fn list(&self) -> Result<Vec<CometSummaryDto>, Error> {
        let comets = CometRepository::new(self.db).list().await?;

        Ok(comets
            .into_iter()
            .map(|comet| CometSummaryDto {
                id: comet.id,
                designation: comet.designation,
                name: comet.name,
            })
            .collect())
    }

    /// Loads a comet with its windows and a freshly reconciled summary index.
    pub async fn load_view(&self, comet_id: i32) -> Result<CometView, Error> {
        let comet = CometRepository::new(self.db)
            .find_by_id(comet_id)
            .await?
            .ok_or(CometError::CometNotFound(comet_id))?;
        let flybys = FlybyRepository::new(self.db).list_by_comet(comet_id).await?;
        let summaries = SummaryRepository::new(self.db)
            .list_by_comet(comet_id)
            .await?;

        let windows = build_windows(comet_id, &flybys);
        let index = SummaryIndexer::new(self.db, comet_id)
            .rebuild(&windows, summaries)
            .await?;

        tracing::debug!(
            comet_id,
            windows = windows.len(),
            summaries = index.len(),
            "Loaded comet view"
        );

        Ok(CometView {
            comet,
            flybys,
            windows,
            index,
        })
    }
}
