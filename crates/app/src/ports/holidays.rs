//! Holiday port: public and school holiday calendars from a remote source.

use std::future::Future;

use sitehub_domain::error::SiteError;

/// Source of holiday calendars. Documents are passed through untouched.
pub trait HolidayProvider {
    /// Public holidays of a civil year.
    fn public_holidays(
        &self,
        year: i32,
    ) -> impl Future<Output = Result<serde_json::Value, SiteError>> + Send;

    /// School holidays of a `YYYY-YYYY` school year.
    fn school_holidays(
        &self,
        school_year: &str,
    ) -> impl Future<Output = Result<serde_json::Value, SiteError>> + Send;
}
