//! Application, progress and donation workflows on top of the record store.
use crate::core::aggregate::{self, Aggregation, DailyBin, DatedEvent};
use crate::core::config::PaymentConfig;
use crate::core::error::DonateError;
use crate::core::money;
use crate::core::payment::{self, PaymentGateway};
use crate::core::records::{Application, Charity, Donation, ProgressUpdate};
use crate::core::split::{self, Receiver};
use crate::store::RecordStore;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use regex::Regex;
use rust_decimal::Decimal;
use std::sync::LazyLock;
use tracing::{debug, error, info, warn};

static VALID_APPLICATION_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("^[a-zA-Z0-9 ]*$").expect("application name pattern is valid")
});

/// Raw application fields as entered by the owner.
#[derive(Debug, Clone, Default)]
pub struct ApplicationForm {
    pub name: String,
    pub description: String,
    pub goal_value: String,
    pub goal_units_singular: String,
    pub goal_units_plural: String,
    pub charities: Vec<u32>,
}

/// Outcome of asking the provider to start a payment.
#[derive(Debug, Clone)]
pub struct DonationStart {
    pub application: Application,
    pub amount: Decimal,
    pub receivers: Vec<Receiver>,
    pub charities: Vec<Charity>,
    pub pay_key: Option<String>,
    pub errors: Vec<String>,
    pub checkout_url: Option<String>,
}

/// Everything shown on an application's page.
#[derive(Debug, Clone)]
pub struct ApplicationView {
    pub application: Application,
    pub charities: Vec<Charity>,
    /// Active donations, newest first
    pub donations: Vec<Donation>,
    pub total_donations: Decimal,
    pub current_value: Decimal,
    pub donation_bins: Vec<DailyBin>,
    pub progress_bins: Vec<DailyBin>,
}

pub struct Tracker<G: PaymentGateway> {
    store: RecordStore,
    gateway: G,
    charities: Vec<Charity>,
    payment: PaymentConfig,
}

impl<G: PaymentGateway> Tracker<G> {
    pub fn new(
        store: RecordStore,
        gateway: G,
        charities: Vec<Charity>,
        payment: PaymentConfig,
    ) -> Self {
        Self {
            store,
            gateway,
            charities,
            payment,
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Configured charities supporting `app`, in configuration order.
    pub fn supporting_charities(&self, app: &Application) -> Vec<Charity> {
        self.charities
            .iter()
            .filter(|c| app.charities.contains(&c.id))
            .cloned()
            .collect()
    }

    fn application(&self, slug: &str) -> Result<Application> {
        self.store
            .get_application(slug)?
            .ok_or_else(|| DonateError::ApplicationNotFound(slug.to_string()).into())
    }

    /// Creates a new application, or edits `existing` when a slug is given.
    ///
    /// Every failed rule is reported at once. Name and slug never change on
    /// edit.
    pub fn save_application(
        &self,
        form: ApplicationForm,
        existing: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Application> {
        let mut messages = Vec::new();

        let current = match existing {
            Some(slug) => {
                let app = self.store.get_application(slug)?;
                if app.is_none() {
                    messages.push("Application with that ID does not exist.".to_string());
                }
                app
            }
            None => {
                if !form.name.is_empty() {
                    if self.store.find_application_by_name(&form.name)?.is_some() {
                        messages.push("An application with that name already exists.".to_string());
                    } else if self
                        .store
                        .get_application(&Application::slug_for(&form.name))?
                        .is_some()
                    {
                        messages.push("An application with that slug already exists.".to_string());
                    }
                }
                None
            }
        };
        let name = current
            .as_ref()
            .map_or(form.name.clone(), |app| app.name.clone());

        if name.is_empty() {
            messages.push("Application name is required.".to_string());
        } else if !VALID_APPLICATION_NAME.is_match(&name) {
            messages.push(
                "Application name may only contain letters, numbers, and spaces.".to_string(),
            );
        }
        if form.description.trim().is_empty() {
            messages.push("Application description is required.".to_string());
        }
        let goal_value = if form.goal_value.trim().is_empty() {
            messages.push("Application goal value is required.".to_string());
            None
        } else {
            match form.goal_value.trim().parse::<u32>() {
                Ok(value) if value > 0 => Some(value),
                _ => {
                    messages.push(
                        "Application goal value must be a whole number greater than zero."
                            .to_string(),
                    );
                    None
                }
            }
        };
        if form.goal_units_singular.trim().is_empty() {
            messages.push("Application's singular goal units is required.".to_string());
        }
        if form.goal_units_plural.trim().is_empty() {
            messages.push("Application's plural goal units is required.".to_string());
        }
        if form.charities.is_empty() {
            messages.push("At least one charity is required.".to_string());
        }
        for id in &form.charities {
            if !self.charities.iter().any(|c| c.id == *id) {
                messages.push(format!("Charity with id {id} does not exist."));
            }
        }

        if !messages.is_empty() {
            debug!(?messages, "Rejected application form");
            return Err(DonateError::InvalidApplication(messages).into());
        }
        let goal_value = goal_value.context("goal value checked above")?;

        let app = match current {
            Some(app) => Application {
                description: form.description,
                goal_value,
                goal_units_singular: form.goal_units_singular,
                goal_units_plural: form.goal_units_plural,
                charities: form.charities,
                updated: now,
                ..app
            },
            None => Application {
                slug: Application::slug_for(&name),
                name,
                description: form.description,
                goal_value,
                goal_units_singular: form.goal_units_singular,
                goal_units_plural: form.goal_units_plural,
                charities: form.charities,
                created: now,
                updated: now,
                is_active: true,
            },
        };

        self.store.put_application(&app)?;
        info!(
            slug = %app.slug,
            edited = existing.is_some(),
            "Saved application"
        );
        Ok(app)
    }

    pub fn delete_application(&self, slug: &str) -> Result<()> {
        if !self.store.delete_application(slug)? {
            return Err(DonateError::ApplicationNotFound(slug.to_string()).into());
        }
        info!(%slug, "Deleted application");
        Ok(())
    }

    pub fn record_progress(
        &self,
        slug: &str,
        value: &str,
        now: DateTime<Utc>,
    ) -> Result<ProgressUpdate> {
        let app = self.application(slug)?;
        if value.trim().is_empty() {
            return Err(DonateError::InvalidInput("Progress is required.".to_string()).into());
        }
        let value = money::parse_amount(value)
            .map_err(|_| DonateError::InvalidInput("Progress must be a number.".to_string()))?;

        let update = ProgressUpdate {
            application: app.slug,
            value,
            created: now,
        };
        self.store.add_progress(&update)?;
        info!(%slug, %value, "Progress updated");
        Ok(update)
    }

    /// Splits the donation, asks the provider for a payKey and records an
    /// inactive donation under it.
    ///
    /// A payKey that comes back together with errors still gets a donation
    /// record, it stays inactive unless the provider later confirms it.
    pub async fn start_donation(&self, slug: &str, amount: &str) -> Result<DonationStart> {
        let app = self.application(slug)?;
        if amount.trim().is_empty() {
            return Err(DonateError::InvalidInput("Donation is required.".to_string()).into());
        }
        let amount = money::parse_amount(amount)
            .map_err(|_| DonateError::InvalidInput("Donation must be a number.".to_string()))?;
        let amount = money::round_cents(amount);
        if amount <= Decimal::ZERO {
            return Err(DonateError::InvalidInput(
                "Donation must be greater than zero.".to_string(),
            )
            .into());
        }

        let charities = self.supporting_charities(&app);
        let receivers = split::split(amount, &charities)?;
        let request = payment::build_pay_request(receivers.clone(), &self.payment);
        let response = self
            .gateway
            .pay(&request)
            .await
            .context("Pay request failed")?;

        let errors = response.errors().unwrap_or_default();
        for message in &errors {
            error!(%slug, "Payment provider error: {}", message);
        }

        let pay_key = response.pay_key().map(str::to_string);
        if let Some(key) = &pay_key {
            let now = Utc::now();
            self.store.put_donation(&Donation {
                pay_key: key.clone(),
                application: app.slug.clone(),
                amount,
                created: now,
                updated: now,
                is_active: false,
            })?;
            info!(%slug, pay_key = %key, %amount, "Recorded pending donation");
        } else {
            warn!(%slug, %amount, "Payment provider returned no payKey");
        }

        let checkout_url = pay_key
            .as_deref()
            .map(|key| payment::checkout_url(&self.payment, key));
        Ok(DonationStart {
            application: app,
            amount,
            receivers,
            charities,
            pay_key,
            errors,
            checkout_url,
        })
    }

    /// Marks the donation complete. Returns the application slug, or `None`
    /// for an unknown payKey.
    pub fn finish_donation(&self, pay_key: &str, now: DateTime<Utc>) -> Result<Option<String>> {
        let Some(mut donation) = self.store.get_donation(pay_key)? else {
            warn!(%pay_key, "Finish for unknown donation");
            return Ok(None);
        };
        donation.is_active = true;
        donation.created = now;
        donation.updated = now;
        self.store.put_donation(&donation)?;
        info!(%pay_key, application = %donation.application, "Donation completed");
        Ok(Some(donation.application))
    }

    /// The supporter backed out. The record is kept, inactive, so abandoned
    /// checkouts can be counted later.
    pub fn cancel_donation(&self, pay_key: &str) -> Result<Option<String>> {
        match self.store.get_donation(pay_key)? {
            Some(donation) => {
                info!(%pay_key, application = %donation.application, "Donation canceled");
                Ok(Some(donation.application))
            }
            None => {
                warn!(%pay_key, "Cancel for unknown donation");
                Ok(None)
            }
        }
    }

    pub fn view_application(&self, slug: &str, now: DateTime<Utc>) -> Result<ApplicationView> {
        let app = self.application(slug)?;
        let start = app.created.date_naive();
        let end = now.date_naive();

        let mut donations: Vec<Donation> = self
            .store
            .donations_for(slug)?
            .into_iter()
            .filter(|d| d.is_active)
            .collect();
        donations.sort_by(|a, b| b.created.cmp(&a.created));
        let total_donations: Decimal = donations.iter().map(|d| d.amount).sum();

        let mut updates = self.store.progress_for(slug)?;
        updates.sort_by(|a, b| b.created.cmp(&a.created));
        let current_value = updates.first().map_or(Decimal::ZERO, |u| u.value);

        let donation_events: Vec<DatedEvent> = donations
            .iter()
            .map(|d| DatedEvent::new(d.created, d.amount))
            .collect();
        let progress_events: Vec<DatedEvent> = updates
            .iter()
            .map(|u| DatedEvent::new(u.created, u.value))
            .collect();

        let donation_bins = aggregate::aggregate_daily(&donation_events, start, end, Aggregation::Sum)?;
        let progress_bins = aggregate::aggregate_daily(&progress_events, start, end, Aggregation::Last)?;

        Ok(ApplicationView {
            charities: self.supporting_charities(&app),
            application: app,
            donations,
            total_donations,
            current_value,
            donation_bins,
            progress_bins,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::payment::{PayError, PayRequest, PayResponse};
    use anyhow::anyhow;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;
    use std::sync::Mutex;

    /// Replays a canned response and remembers the requests it saw.
    struct MockGateway {
        response: Option<PayResponse>,
        requests: Mutex<Vec<PayRequest>>,
    }

    impl MockGateway {
        fn responding(pay_key: Option<&str>, errors: &[&str]) -> Self {
            let error = if errors.is_empty() {
                None
            } else {
                Some(
                    errors
                        .iter()
                        .map(|m| PayError {
                            message: Some(m.to_string()),
                        })
                        .collect(),
                )
            };
            Self {
                response: Some(PayResponse {
                    pay_key: pay_key.map(str::to_string),
                    error,
                }),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                response: None,
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl PaymentGateway for MockGateway {
        async fn pay(&self, request: &PayRequest) -> Result<PayResponse> {
            self.requests.lock().unwrap().push(request.clone());
            self.response
                .clone()
                .ok_or_else(|| anyhow!("connection refused"))
        }
    }

    fn charities() -> Vec<Charity> {
        vec![
            Charity {
                id: 1,
                name: "Boys and Girls Club of America".to_string(),
                email: "char1@example.com".to_string(),
            },
            Charity {
                id: 2,
                name: "Red Cross".to_string(),
                email: "char2@example.com".to_string(),
            },
            Charity {
                id: 3,
                name: "Wikipedia".to_string(),
                email: "char3@example.com".to_string(),
            },
        ]
    }

    fn tracker(gateway: MockGateway) -> Tracker<MockGateway> {
        Tracker::new(
            RecordStore::in_memory(),
            gateway,
            charities(),
            PaymentConfig::default(),
        )
    }

    fn form(name: &str) -> ApplicationForm {
        ApplicationForm {
            name: name.to_string(),
            description: "Please reward me for losing weight.".to_string(),
            goal_value: "20".to_string(),
            goal_units_singular: "pound".to_string(),
            goal_units_plural: "pounds".to_string(),
            charities: vec![1, 2, 3],
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 15, 0, 0).unwrap()
    }

    fn messages(err: anyhow::Error) -> Vec<String> {
        match err.downcast::<DonateError>() {
            Ok(DonateError::InvalidApplication(messages)) => messages,
            other => panic!("expected invalid application, got {other:?}"),
        }
    }

    #[test]
    fn test_create_application() {
        let tracker = tracker(MockGateway::failing());
        let app = tracker
            .save_application(form("Help John Lose Weight"), None, t0())
            .unwrap();

        assert_eq!(app.slug, "help-john-lose-weight");
        assert_eq!(app.goal_value, 20);
        assert_eq!(app.created, t0());
        assert!(app.is_active);
        assert_eq!(
            tracker.store().get_application("help-john-lose-weight").unwrap(),
            Some(app)
        );
    }

    #[test]
    fn test_create_application_collects_every_error() {
        let tracker = tracker(MockGateway::failing());
        let err = tracker
            .save_application(
                ApplicationForm {
                    name: "Bad_Name!".to_string(),
                    goal_value: "-3".to_string(),
                    charities: vec![9],
                    ..ApplicationForm::default()
                },
                None,
                t0(),
            )
            .unwrap_err();

        assert_eq!(
            messages(err),
            vec![
                "Application name may only contain letters, numbers, and spaces.",
                "Application description is required.",
                "Application goal value must be a whole number greater than zero.",
                "Application's singular goal units is required.",
                "Application's plural goal units is required.",
                "Charity with id 9 does not exist.",
            ]
        );
        assert!(tracker.store().list_applications().unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_name_is_rejected() {
        let tracker = tracker(MockGateway::failing());
        tracker.save_application(form("Run A Marathon"), None, t0()).unwrap();
        let err = tracker
            .save_application(form("Run A Marathon"), None, t0())
            .unwrap_err();
        assert_eq!(
            messages(err),
            vec!["An application with that name already exists."]
        );
    }

    #[test]
    fn test_name_differing_only_in_case_is_rejected() {
        let tracker = tracker(MockGateway::failing());
        let first = tracker.save_application(form("Run A"), None, t0()).unwrap();
        tracker
            .record_progress(&first.slug, "2", t0() + Duration::hours(1))
            .unwrap();

        let later = t0() + Duration::days(2);
        let err = tracker
            .save_application(form("run a"), None, later)
            .unwrap_err();
        assert_eq!(
            messages(err),
            vec!["An application with that slug already exists."]
        );

        let stored = tracker.store().get_application("run-a").unwrap().unwrap();
        assert_eq!(stored.name, "Run A");
        assert_eq!(stored.created, t0());
        let view = tracker.view_application("run-a", later).unwrap();
        assert_eq!(view.current_value, dec!(2));
    }

    #[test]
    fn test_edit_keeps_name_and_slug() {
        let tracker = tracker(MockGateway::failing());
        let created = tracker.save_application(form("Run A Marathon"), None, t0()).unwrap();

        let later = t0() + Duration::days(2);
        let edited = tracker
            .save_application(
                ApplicationForm {
                    name: "Something Else".to_string(),
                    goal_value: "26".to_string(),
                    goal_units_singular: "mile".to_string(),
                    goal_units_plural: "miles".to_string(),
                    charities: vec![2],
                    ..form("ignored")
                },
                Some(&created.slug),
                later,
            )
            .unwrap();

        assert_eq!(edited.name, "Run A Marathon");
        assert_eq!(edited.slug, "run-a-marathon");
        assert_eq!(edited.goal_value, 26);
        assert_eq!(edited.charities, vec![2]);
        assert_eq!(edited.created, t0());
        assert_eq!(edited.updated, later);
    }

    #[test]
    fn test_edit_unknown_application() {
        let tracker = tracker(MockGateway::failing());
        let err = tracker
            .save_application(form("Anything"), Some("missing"), t0())
            .unwrap_err();
        assert_eq!(
            messages(err),
            vec!["Application with that ID does not exist."]
        );
    }

    #[test]
    fn test_delete_application() {
        let tracker = tracker(MockGateway::failing());
        let app = tracker.save_application(form("Swim"), None, t0()).unwrap();
        tracker.delete_application(&app.slug).unwrap();
        assert!(tracker.store().get_application("swim").unwrap().is_none());

        let err = tracker.delete_application("swim").unwrap_err();
        assert_eq!(
            err.downcast::<DonateError>().unwrap(),
            DonateError::ApplicationNotFound("swim".to_string())
        );
    }

    #[test]
    fn test_record_progress_validates_value() {
        let tracker = tracker(MockGateway::failing());
        let app = tracker.save_application(form("Swim"), None, t0()).unwrap();

        let err = tracker.record_progress(&app.slug, "", t0()).unwrap_err();
        assert_eq!(
            err.downcast::<DonateError>().unwrap(),
            DonateError::InvalidInput("Progress is required.".to_string())
        );
        let err = tracker.record_progress(&app.slug, "lots", t0()).unwrap_err();
        assert_eq!(
            err.downcast::<DonateError>().unwrap(),
            DonateError::InvalidInput("Progress must be a number.".to_string())
        );

        let update = tracker.record_progress(&app.slug, "4.5", t0()).unwrap();
        assert_eq!(update.value, dec!(4.5));
        assert_eq!(tracker.store().progress_for("swim").unwrap(), vec![update]);
    }

    #[tokio::test]
    async fn test_start_donation_splits_and_records_pending() {
        let tracker = tracker(MockGateway::responding(Some("AP-123"), &[]));
        let app = tracker.save_application(form("Swim"), None, t0()).unwrap();

        let start = tracker.start_donation(&app.slug, "10").await.unwrap();

        assert_eq!(start.pay_key.as_deref(), Some("AP-123"));
        assert!(start.errors.is_empty());
        assert_eq!(
            start.checkout_url.as_deref(),
            Some("https://www.sandbox.paypal.com/cgi-bin/webscr?cmd=_ap-payment&paykey=AP-123")
        );
        let amounts: Vec<Decimal> = start.receivers.iter().map(|r| r.amount).collect();
        assert_eq!(amounts, vec![dec!(3.34), dec!(3.33), dec!(3.33)]);
        assert_eq!(start.receivers[0].email, "char1@example.com");

        let requests = tracker.gateway.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].receiver_list.receiver, start.receivers);
        drop(requests);

        let donation = tracker.store().get_donation("AP-123").unwrap().unwrap();
        assert_eq!(donation.amount, dec!(10.00));
        assert_eq!(donation.application, "swim");
        assert!(!donation.is_active);
    }

    #[tokio::test]
    async fn test_start_donation_only_pays_supporting_charities() {
        let tracker = tracker(MockGateway::responding(Some("AP-7"), &[]));
        let app = tracker
            .save_application(
                ApplicationForm {
                    charities: vec![3, 1],
                    ..form("Swim")
                },
                None,
                t0(),
            )
            .unwrap();

        let start = tracker.start_donation(&app.slug, "25.00").await.unwrap();
        let emails: Vec<&str> = start.receivers.iter().map(|r| r.email.as_str()).collect();
        assert_eq!(emails, vec!["char1@example.com", "char3@example.com"]);
        assert_eq!(start.receivers[0].amount, dec!(12.50));
    }

    #[tokio::test]
    async fn test_start_donation_rejects_bad_amounts_before_paying() {
        let tracker = tracker(MockGateway::responding(Some("AP-1"), &[]));
        let app = tracker.save_application(form("Swim"), None, t0()).unwrap();

        for (amount, message) in [
            ("", "Donation is required."),
            ("abc", "Donation must be a number."),
            ("0", "Donation must be greater than zero."),
            ("-5", "Donation must be greater than zero."),
        ] {
            let err = tracker.start_donation(&app.slug, amount).await.unwrap_err();
            assert_eq!(
                err.downcast::<DonateError>().unwrap(),
                DonateError::InvalidInput(message.to_string())
            );
        }
        assert!(tracker.gateway.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_start_donation_with_errors_and_no_key_records_nothing() {
        let tracker = tracker(MockGateway::responding(None, &["Invalid credentials"]));
        let app = tracker.save_application(form("Swim"), None, t0()).unwrap();

        let start = tracker.start_donation(&app.slug, "10").await.unwrap();
        assert!(start.pay_key.is_none());
        assert!(start.checkout_url.is_none());
        assert_eq!(start.errors, vec!["Invalid credentials"]);
        assert!(tracker.store().donations_for("swim").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_start_donation_with_key_and_errors_records_inactive() {
        let tracker = tracker(MockGateway::responding(Some("AP-5"), &["Receiver warning"]));
        let app = tracker.save_application(form("Swim"), None, t0()).unwrap();

        let start = tracker.start_donation(&app.slug, "10").await.unwrap();
        assert_eq!(start.errors, vec!["Receiver warning"]);
        let donation = tracker.store().get_donation("AP-5").unwrap().unwrap();
        assert!(!donation.is_active);
    }

    #[tokio::test]
    async fn test_start_donation_transport_failure() {
        let tracker = tracker(MockGateway::failing());
        let app = tracker.save_application(form("Swim"), None, t0()).unwrap();

        let err = tracker.start_donation(&app.slug, "10").await.unwrap_err();
        assert!(format!("{err:#}").contains("connection refused"));
        assert!(tracker.store().donations_for("swim").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_finish_and_cancel_donation() {
        let tracker = tracker(MockGateway::responding(Some("AP-9"), &[]));
        let app = tracker.save_application(form("Swim"), None, t0()).unwrap();
        tracker.start_donation(&app.slug, "10").await.unwrap();

        assert_eq!(
            tracker.cancel_donation("AP-9").unwrap(),
            Some("swim".to_string())
        );
        assert!(!tracker.store().get_donation("AP-9").unwrap().unwrap().is_active);

        let done_at = t0() + Duration::hours(3);
        assert_eq!(
            tracker.finish_donation("AP-9", done_at).unwrap(),
            Some("swim".to_string())
        );
        let donation = tracker.store().get_donation("AP-9").unwrap().unwrap();
        assert!(donation.is_active);
        assert_eq!(donation.created, done_at);

        assert_eq!(tracker.finish_donation("AP-unknown", done_at).unwrap(), None);
        assert_eq!(tracker.cancel_donation("AP-unknown").unwrap(), None);
    }

    #[tokio::test]
    async fn test_view_application_charts() {
        let tracker = tracker(MockGateway::responding(Some("AP-1"), &[]));
        let app = tracker.save_application(form("Swim"), None, t0()).unwrap();
        let store = tracker.store();

        let day = Duration::days(1);
        for (key, amount, at, active) in [
            ("AP-1", dec!(5.00), t0() + day, true),
            ("AP-2", dec!(7.50), t0() + day + Duration::hours(2), true),
            ("AP-3", dec!(3.00), t0() + day * 3, true),
            ("AP-4", dec!(99.00), t0() + day * 2, false),
        ] {
            store
                .put_donation(&Donation {
                    pay_key: key.to_string(),
                    application: app.slug.clone(),
                    amount,
                    created: at,
                    updated: at,
                    is_active: active,
                })
                .unwrap();
        }
        tracker.record_progress(&app.slug, "3", t0() + day * 2).unwrap();
        tracker
            .record_progress(&app.slug, "5", t0() + day * 2 + Duration::hours(1))
            .unwrap();
        tracker.record_progress(&app.slug, "6", t0() + day * 4).unwrap();

        let view = tracker.view_application(&app.slug, t0() + day * 4).unwrap();

        assert_eq!(view.total_donations, dec!(15.50));
        assert_eq!(view.current_value, dec!(6));
        assert_eq!(view.charities.len(), 3);
        let keys: Vec<&str> = view.donations.iter().map(|d| d.pay_key.as_str()).collect();
        assert_eq!(keys, vec!["AP-3", "AP-2", "AP-1"]);

        let donation_ys: Vec<Decimal> = view.donation_bins.iter().map(|b| b.y).collect();
        assert_eq!(
            donation_ys,
            vec![dec!(0), dec!(12.50), dec!(0), dec!(3.00), dec!(0)]
        );
        let progress_ys: Vec<Decimal> = view.progress_bins.iter().map(|b| b.y).collect();
        assert_eq!(
            progress_ys,
            vec![dec!(0), dec!(0), dec!(5), dec!(0), dec!(6)]
        );
    }

    #[test]
    fn test_view_application_without_activity() {
        let tracker = tracker(MockGateway::failing());
        let app = tracker.save_application(form("Swim"), None, t0()).unwrap();

        let view = tracker.view_application(&app.slug, t0()).unwrap();
        assert_eq!(view.total_donations, Decimal::ZERO);
        assert_eq!(view.current_value, Decimal::ZERO);
        assert_eq!(view.donation_bins.len(), 1);
        assert_eq!(view.progress_bins.len(), 1);

        let err = tracker.view_application("missing", t0()).unwrap_err();
        assert_eq!(
            err.downcast::<DonateError>().unwrap(),
            DonateError::ApplicationNotFound("missing".to_string())
        );
    }
}
