//! The four portal operations offered to the rest of the platform.
//!
//! Each call logs in from scratch and drops its session on return. Nothing
//! is cached between calls, so retrying a failed call always re-authenticates.

use std::sync::Arc;

use crate::auth::SessionAuthenticator;
use crate::config::PortalConfig;
use crate::course::fetch_courses;
use crate::detail::fetch_detailed;
use crate::grade::fetch_grades;
use crate::term::Period;
use crate::types::{Course, CourseSource, Credential, Grade, PortalResult};

/// Stateless facade over the portal engine.
#[derive(Debug, Clone)]
pub struct AcademicPortal {
    config: Arc<PortalConfig>,
    authenticator: SessionAuthenticator,
}

impl AcademicPortal {
    pub fn new(config: PortalConfig) -> Self {
        let config = Arc::new(config);
        Self {
            authenticator: SessionAuthenticator::new(config.clone()),
            config,
        }
    }

    pub fn config(&self) -> &PortalConfig {
        &self.config
    }

    /// Check a credential pair against CAS.
    pub async fn login(&self, credential: &Credential) -> PortalResult<bool> {
        self.authenticator.login(credential).await?;
        Ok(true)
    }

    /// List the student's courses from the chosen source.
    ///
    /// With [`CourseSource::GradeDerived`] the rows come from the grade query
    /// and each course is stamped with its grade row's year and term.
    pub async fn course_list(
        &self,
        credential: &Credential,
        period: &Period,
        source: CourseSource,
    ) -> PortalResult<Vec<Course>> {
        let session = self.authenticator.login_academic(credential).await?;
        match source {
            CourseSource::Legacy => fetch_courses(&session, period).await,
            CourseSource::GradeDerived => {
                let grades = fetch_grades(&session, period).await?;
                Ok(grades
                    .into_iter()
                    .map(|g| Course {
                        year: g.year,
                        term: g.term,
                        ..g.course
                    })
                    .collect())
            }
        }
    }

    /// Grade summary, totals only.
    pub async fn grades(
        &self,
        credential: &Credential,
        period: &Period,
    ) -> PortalResult<Vec<Grade>> {
        let session = self.authenticator.login_academic(credential).await?;
        fetch_grades(&session, period).await
    }

    /// Grades with regular/final/total breakdowns, all on one session.
    pub async fn detailed_grades(
        &self,
        credential: &Credential,
        period: &Period,
    ) -> PortalResult<Vec<Grade>> {
        let session = self.authenticator.login_academic(credential).await?;
        tracing::info!("Authenticated, fetching detailed grades");
        let grades = fetch_detailed(session, period).await?;
        tracing::info!("Detailed grades complete: {} courses", grades.len());
        Ok(grades)
    }
}
