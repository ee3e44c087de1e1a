//! One run of the notifier: resolve dates, fetch and reconcile each day, render
//! once, then mail the result.

use lunchline_menu::{
    CategoryView, DayMenu, FetchError, MenuQuery, MenuSource, PrekMatches, RenderOptions, Report,
    ReportMode, ServingDay, prek_entree, render, resolve,
};
use lunchline_notification::{DispatchReport, Outbox, Recipients, dispatch, render_email};
use thiserror::Error;
use time::Date;

use crate::config::Config;

#[derive(Error, Debug)]
pub enum RunError {
    #[error("Failed to fetch menu data for {date}: {source}")]
    FetchFailed {
        date: String,
        #[source]
        source: FetchError,
    },

    #[error("Failed to send menu email to any of {attempted} recipient(s)")]
    DispatchFailed { attempted: usize },
}

/// Run parameters, fixed for the lifetime of a [`Notifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub school_id: String,
    pub grade: String,
    pub serving_line: String,
    pub meal_type: String,
    pub prek_grade: String,
    pub prek_serving_line: String,
    pub view: CategoryView,
    pub test_run: bool,
}

impl Settings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            school_id: config.school.id.clone(),
            grade: config.school.grade.clone(),
            serving_line: config.school.serving_line.clone(),
            meal_type: config.school.meal_type.clone(),
            prek_grade: config.school.prek_grade.clone(),
            prek_serving_line: config.school.prek_serving_line.clone(),
            view: config.report.view,
            test_run: config.test_run,
        }
    }
}

pub struct Notifier<S> {
    settings: Settings,
    source: S,
}

impl<S: MenuSource> Notifier<S> {
    pub fn new(settings: Settings, source: S) -> Self {
        Self { settings, source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    fn query(&self, day: &ServingDay, grade: &str, serving_line: &str) -> MenuQuery {
        MenuQuery {
            school_id: self.settings.school_id.clone(),
            serving_date: day.serving_date(),
            serving_line: serving_line.to_owned(),
            meal_type: self.settings.meal_type.clone(),
            grade: grade.to_owned(),
        }
    }

    /// Fetches, reconciles and renders every day of the window.
    ///
    /// A failed day becomes a placeholder in weekly mode. In daily mode the
    /// single day is the whole report, so its failure fails the run.
    #[tracing::instrument(skip(self), fields(test_run = self.settings.test_run))]
    pub async fn prepare(&self, mode: ReportMode, today: Date) -> Result<Report, RunError> {
        let window = resolve(mode, today, self.settings.test_run);
        let mut days = Vec::with_capacity(window.len());
        let mut prek = PrekMatches::new();

        for day in &window {
            tracing::info!(date = %day, "Processing menu");

            let primary = self
                .source
                .fetch(&self.query(day, &self.settings.grade, &self.settings.serving_line))
                .await;

            let menu = match primary {
                Ok(menu) => {
                    if menu.is_empty() {
                        tracing::info!(
                            date = %day,
                            "No menu for this day, likely weekend or holiday"
                        );
                    }
                    Some(menu)
                }
                Err(source) if mode == ReportMode::Daily => {
                    tracing::error!(date = %day, err = %source, "Failed to fetch menu data");
                    return Err(RunError::FetchFailed {
                        date: day.serving_date(),
                        source,
                    });
                }
                Err(err) => {
                    tracing::warn!(
                        date = %day,
                        err = %err,
                        "Could not fetch menu data, showing placeholder"
                    );
                    None
                }
            };

            let prek_menu = self
                .source
                .fetch(&self.query(
                    day,
                    &self.settings.prek_grade,
                    &self.settings.prek_serving_line,
                ))
                .await;

            match prek_menu {
                Ok(prek_menu) => {
                    if let Some(entree) = prek_entree(menu.as_ref(), Some(&prek_menu)) {
                        tracing::info!(date = %day, entree = %entree, "PreK entree identified");
                        prek.insert(day.date, entree);
                    }
                }
                Err(err) => {
                    tracing::warn!(date = %day, err = %err, "Could not fetch PreK menu data");
                }
            }

            days.push(DayMenu { day: *day, menu });
        }

        let options = RenderOptions {
            mode,
            test_run: self.settings.test_run,
            meal_type: self.settings.meal_type.clone(),
            view: self.settings.view,
        };

        Ok(render(&days, &prek, &options))
    }

    /// Mails the report. Succeeds when at least one recipient got it.
    pub async fn deliver<O: Outbox + ?Sized>(
        &self,
        report: &Report,
        outbox: &O,
        recipients: &Recipients,
    ) -> Result<DispatchReport, RunError> {
        let email = render_email(report);
        let outcome = dispatch(outbox, &email, recipients, self.settings.test_run).await;

        if !outcome.is_success() {
            tracing::error!(
                attempted = outcome.attempted(),
                "Failed to send emails to any recipients"
            );
            return Err(RunError::DispatchFailed {
                attempted: outcome.attempted(),
            });
        }

        if outcome.is_partial() {
            tracing::warn!(
                sent = outcome.succeeded(),
                attempted = outcome.attempted(),
                "Partially successful delivery"
            );
        } else {
            tracing::info!(sent = outcome.succeeded(), "All emails sent successfully");
        }

        Ok(outcome)
    }

    pub async fn run<O: Outbox + ?Sized>(
        &self,
        mode: ReportMode,
        today: Date,
        outbox: &O,
        recipients: &Recipients,
    ) -> Result<DispatchReport, RunError> {
        let report = self.prepare(mode, today).await?;
        self.deliver(&report, outbox, recipients).await
    }
}
