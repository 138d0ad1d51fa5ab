//! Discord webhook notifications.

use std::time::Duration;

use chrono::{Local, NaiveTime};
use serde::Serialize;
use tracing::debug;

use crate::domain::{format_date, format_hhmm};

use super::{AlternativesReport, DirectAvailability, ItineraryView, NotifyError, Notifier};

/// Embed colour (Discord blue).
const EMBED_COLOR: u32 = 3447003;

/// Discord rejects embeds with more fields than this.
const MAX_FIELDS: usize = 25;

/// Upper bound on the characters of one embed, summed over its title,
/// description, field names, field values and footer.
const MAX_EMBED_CHARS: usize = 6000;

/// Upper bound on the characters of one field value.
const MAX_FIELD_VALUE_CHARS: usize = 1024;

/// Shown when a time is unknown.
const UNKNOWN_TIME: &str = "--:--";

/// Webhook request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebhookPayload {
    pub content: String,
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Embed {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub color: u32,
    pub fields: Vec<EmbedField>,
    pub footer: EmbedFooter,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedFooter {
    pub text: String,
}

/// Build the message for free seats on the watched route.
///
/// One inline field per carriage that has free seats.
pub fn direct_payload(availability: &DirectAvailability, currency: &str) -> WebhookPayload {
    let details = &availability.details;

    let clock = |t: Option<chrono::DateTime<chrono::FixedOffset>>| {
        t.map(|dt| format_hhmm(dt.time()))
            .unwrap_or_else(|| UNKNOWN_TIME.to_string())
    };
    let date = details
        .departure_date()
        .map(format_date)
        .unwrap_or_default();

    let fields = availability
        .vehicles
        .iter()
        .filter(|v| v.free_seats > 0)
        .take(MAX_FIELDS)
        .map(|v| EmbedField {
            name: format!("Vehicle Number: {}", v.vehicle_number),
            value: format!("Number of Free Seats: {}", v.free_seats),
            inline: true,
        })
        .collect();

    WebhookPayload {
        content: String::new(),
        embeds: vec![Embed {
            title: format!(
                "Tickets available ({} -> {}) - {} -> {} [{}]",
                details.departure_city,
                details.arrival_city,
                clock(details.departure),
                clock(details.arrival),
                date
            ),
            description: Some(format!(
                "Travel Time: {}, Free seats count: {}",
                details.travel_time, details.free_seats
            )),
            color: EMBED_COLOR,
            fields,
            footer: EmbedFooter {
                text: format!(
                    "Price From: {:.0} {currency}, Price To: {:.0} {currency}",
                    details.price_from, details.price_to
                ),
            },
        }],
    }
}

/// Build the message listing alternative itineraries.
///
/// One field per itinerary, each listing its legs. Itineraries with no
/// renderable legs are left out. Legs that would overflow a field value are
/// dropped and counted, and itineraries stop being added once the embed
/// would exceed its size limit.
pub fn alternatives_payload(
    report: &AlternativesReport,
    currency: &str,
    updated_at: NaiveTime,
) -> WebhookPayload {
    let title = format!(
        "Alternative routes {} -> {} ({})",
        report.from,
        report.to,
        format_date(report.date)
    );
    let footer = format!("Last updated at {}", updated_at.format("%H:%M:%S"));

    let mut budget = MAX_EMBED_CHARS.saturating_sub(char_len(&title) + char_len(&footer));
    let mut fields = Vec::new();

    for itinerary in report.itineraries.iter().filter(|i| !i.legs.is_empty()) {
        if fields.len() == MAX_FIELDS {
            break;
        }

        let name = format!(
            "Alternative route with Total Price: {} {currency}",
            itinerary.total_price
        );
        let value = field_value(itinerary, currency);

        let cost = char_len(&name) + char_len(&value);
        if cost > budget {
            debug!(
                shown = fields.len(),
                total = report.itineraries.len(),
                "embed size limit reached"
            );
            break;
        }
        budget -= cost;

        fields.push(EmbedField {
            name,
            value,
            inline: false,
        });
    }

    WebhookPayload {
        content: String::new(),
        embeds: vec![Embed {
            title,
            description: None,
            color: EMBED_COLOR,
            fields,
            footer: EmbedFooter { text: footer },
        }],
    }
}

/// The legs of one itinerary, as many as fit in a field value.
fn field_value(itinerary: &ItineraryView, currency: &str) -> String {
    let lines: Vec<String> = itinerary
        .legs
        .iter()
        .map(|leg| {
            format!(
                "**{} -> {}** (Departure: {}, Arrival: {})\n*Free Seats: {}, Price: {} {currency}*\n",
                leg.from, leg.to, leg.departure, leg.arrival, leg.free_seats, leg.price
            )
        })
        .collect();

    let full: usize = lines.iter().map(|l| char_len(l)).sum();
    if full <= MAX_FIELD_VALUE_CHARS {
        return lines.concat();
    }

    // Leave room for the note about the dropped legs.
    let room = MAX_FIELD_VALUE_CHARS.saturating_sub(char_len(&more_legs(lines.len())));
    let mut value = String::new();
    let mut used = 0;
    let mut kept = 0;
    for line in &lines {
        let len = char_len(line);
        if used + len > room {
            break;
        }
        value.push_str(line);
        used += len;
        kept += 1;
    }
    value.push_str(&more_legs(lines.len() - kept));
    value
}

fn more_legs(count: usize) -> String {
    format!("*... and {count} more legs*")
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Notifier posting embeds to Discord webhooks.
#[derive(Debug, Clone)]
pub struct DiscordNotifier {
    http: reqwest::Client,
    currency: String,
}

impl DiscordNotifier {
    /// Create a notifier quoting prices in `currency`.
    pub fn new(currency: impl Into<String>, timeout: Duration) -> Result<Self, NotifyError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            currency: currency.into(),
        })
    }

    async fn post(&self, target: &str, payload: &WebhookPayload) -> Result<(), NotifyError> {
        if !(target.starts_with("https://") || target.starts_with("http://")) {
            return Err(NotifyError::InvalidTarget(target.to_string()));
        }

        let response = self.http.post(target).json(payload).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        debug!(status = status.as_u16(), "notification delivered");
        Ok(())
    }
}

impl Notifier for DiscordNotifier {
    async fn notify_direct(
        &self,
        target: &str,
        availability: &DirectAvailability,
    ) -> Result<(), NotifyError> {
        let payload = direct_payload(availability, &self.currency);
        self.post(target, &payload).await
    }

    async fn notify_alternatives(
        &self,
        target: &str,
        report: &AlternativesReport,
    ) -> Result<(), NotifyError> {
        let payload = alternatives_payload(report, &self.currency, Local::now().time());
        self.post(target, &payload).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RouteDetails, VehicleSeats, parse_timestamp};
    use crate::notify::{ItineraryView, LegView};
    use axum::Router;
    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::routing::post;
    use chrono::NaiveDate;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    fn details() -> RouteDetails {
        RouteDetails {
            price_from: 149.0,
            price_to: 299.0,
            free_seats: 3,
            departure_city: "Praha".into(),
            arrival_city: "Ostrava".into(),
            travel_time: "03:26 h".into(),
            departure: Some(parse_timestamp("2024-03-15T10:04:00.000+01:00").unwrap()),
            arrival: Some(parse_timestamp("2024-03-15T13:30:00.000+01:00").unwrap()),
        }
    }

    fn direct() -> DirectAvailability {
        DirectAvailability {
            details: details(),
            vehicles: vec![
                VehicleSeats {
                    vehicle_number: 1,
                    free_seats: 0,
                },
                VehicleSeats {
                    vehicle_number: 2,
                    free_seats: 3,
                },
            ],
        }
    }

    fn report() -> AlternativesReport {
        let leg = |from: &str, to: &str, dep: &str, arr: &str| LegView {
            from: from.into(),
            to: to.into(),
            departure: dep.into(),
            arrival: arr.into(),
            free_seats: 2,
            price: "100.00".into(),
        };

        AlternativesReport {
            from: "Praha".into(),
            to: "Ostrava".into(),
            date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            itineraries: vec![ItineraryView {
                legs: vec![
                    leg("Praha", "Pardubice", "10:04", "10:58"),
                    leg("Pardubice", "Ostrava", "11:00", "13:30"),
                ],
                total_price: "200.00".into(),
                departure_date: "15.03.2024".into(),
                leg_count: 2,
                changes: 1,
                min_free_seats: 2,
                skipped: Vec::new(),
            }],
        }
    }

    #[test]
    fn direct_message() {
        let payload = direct_payload(&direct(), "CZK");
        let embed = &payload.embeds[0];

        assert_eq!(
            embed.title,
            "Tickets available (Praha -> Ostrava) - 10:04 -> 13:30 [15.03.2024]"
        );
        assert_eq!(
            embed.description.as_deref(),
            Some("Travel Time: 03:26 h, Free seats count: 3")
        );
        assert_eq!(embed.color, 3447003);
        assert_eq!(
            embed.fields,
            vec![EmbedField {
                name: "Vehicle Number: 2".into(),
                value: "Number of Free Seats: 3".into(),
                inline: true,
            }]
        );
        assert_eq!(embed.footer.text, "Price From: 149 CZK, Price To: 299 CZK");
    }

    #[test]
    fn direct_message_without_times() {
        let mut availability = direct();
        availability.details.departure = None;
        availability.details.arrival = None;

        let payload = direct_payload(&availability, "EUR");
        assert_eq!(
            payload.embeds[0].title,
            "Tickets available (Praha -> Ostrava) - --:-- -> --:-- []"
        );
    }

    #[test]
    fn alternatives_message() {
        let payload = alternatives_payload(&report(), "CZK", NaiveTime::from_hms_opt(9, 5, 7).unwrap());
        let embed = &payload.embeds[0];

        assert_eq!(embed.title, "Alternative routes Praha -> Ostrava (15.03.2024)");
        assert_eq!(embed.fields.len(), 1);
        assert_eq!(
            embed.fields[0].name,
            "Alternative route with Total Price: 200.00 CZK"
        );
        assert_eq!(
            embed.fields[0].value,
            "**Praha -> Pardubice** (Departure: 10:04, Arrival: 10:58)\n*Free Seats: 2, Price: 100.00 CZK*\n\
             **Pardubice -> Ostrava** (Departure: 11:00, Arrival: 13:30)\n*Free Seats: 2, Price: 100.00 CZK*\n"
        );
        assert!(!embed.fields[0].inline);
        assert_eq!(embed.footer.text, "Last updated at 09:05:07");

        let json = serde_json::to_value(&payload).unwrap();
        assert!(json["embeds"][0].get("description").is_none());
    }

    #[test]
    fn field_count_capped() {
        let mut report = report();
        let itinerary = report.itineraries[0].clone();
        report.itineraries = vec![itinerary; 40];

        let payload = alternatives_payload(&report, "CZK", NaiveTime::from_hms_opt(0, 0, 0).unwrap());
        assert_eq!(payload.embeds[0].fields.len(), 25);
    }

    fn embed_chars(embed: &Embed) -> usize {
        let text = |s: &str| s.chars().count();
        text(&embed.title)
            + embed.description.as_deref().map_or(0, text)
            + embed
                .fields
                .iter()
                .map(|f| text(&f.name) + text(&f.value))
                .sum::<usize>()
            + text(&embed.footer.text)
    }

    fn long_leg(n: usize) -> LegView {
        LegView {
            from: format!("Ústí nad Labem západ zastávka {n}"),
            to: format!("Frýdek-Místek Lískovec u Frýdku {}", n + 1),
            departure: "10:04".into(),
            arrival: "10:58".into(),
            free_seats: 12,
            price: "1234.50".into(),
        }
    }

    #[test]
    fn embed_stays_within_size_limit() {
        let mut report = report();
        let itinerary = ItineraryView {
            legs: (0..4).map(long_leg).collect(),
            leg_count: 4,
            changes: 3,
            ..report.itineraries[0].clone()
        };
        report.itineraries = vec![itinerary; 25];

        let payload = alternatives_payload(&report, "CZK", NaiveTime::from_hms_opt(0, 0, 0).unwrap());
        let embed = &payload.embeds[0];

        assert!(!embed.fields.is_empty());
        assert!(embed.fields.len() < 25);
        assert!(embed_chars(embed) <= 6000, "{} chars", embed_chars(embed));
    }

    #[test]
    fn long_itinerary_value_is_truncated() {
        let mut report = report();
        report.itineraries[0].legs = (0..20).map(long_leg).collect();
        report.itineraries[0].leg_count = 20;

        let payload = alternatives_payload(&report, "CZK", NaiveTime::from_hms_opt(0, 0, 0).unwrap());
        let value = &payload.embeds[0].fields[0].value;

        assert!(value.chars().count() <= 1024, "{} chars", value.chars().count());
        assert!(value.starts_with("**Ústí nad Labem západ zastávka 0 -> "));
        assert!(value.ends_with("more legs*"));
    }

    #[test]
    fn itinerary_without_rendered_legs_is_left_out() {
        let mut report = report();
        let mut unrenderable = report.itineraries[0].clone();
        unrenderable.legs.clear();
        report.itineraries.insert(0, unrenderable);

        let payload = alternatives_payload(&report, "CZK", NaiveTime::from_hms_opt(0, 0, 0).unwrap());
        let fields = &payload.embeds[0].fields;

        assert_eq!(fields.len(), 1);
        assert!(fields.iter().all(|f| !f.value.is_empty()));
    }

    type Received = Arc<Mutex<Vec<serde_json::Value>>>;

    async fn webhook(status: StatusCode) -> (String, Received) {
        let received: Received = Arc::default();
        let router = Router::new()
            .route(
                "/hook",
                post(
                    move |State(received): State<Received>,
                          axum::Json(body): axum::Json<serde_json::Value>| async move {
                        received.lock().await.push(body);
                        status
                    },
                ),
            )
            .with_state(received.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        (format!("http://{addr}/hook"), received)
    }

    #[tokio::test]
    async fn posts_to_webhook() {
        let (url, received) = webhook(StatusCode::NO_CONTENT).await;
        let notifier = DiscordNotifier::new("CZK", Duration::from_secs(5)).unwrap();

        notifier.notify_direct(&url, &direct()).await.unwrap();
        notifier.notify_alternatives(&url, &report()).await.unwrap();

        let received = received.lock().await;
        assert_eq!(received.len(), 2);
        assert_eq!(received[0]["embeds"][0]["color"], 3447003);
        assert_eq!(
            received[1]["embeds"][0]["title"],
            "Alternative routes Praha -> Ostrava (15.03.2024)"
        );
    }

    #[tokio::test]
    async fn rejected_delivery_is_an_error() {
        let (url, _) = webhook(StatusCode::BAD_REQUEST).await;
        let notifier = DiscordNotifier::new("CZK", Duration::from_secs(5)).unwrap();

        let result = notifier.notify_direct(&url, &direct()).await;
        assert!(matches!(result, Err(NotifyError::Rejected { status: 400, .. })));
    }

    #[tokio::test]
    async fn non_http_target_rejected() {
        let notifier = DiscordNotifier::new("CZK", Duration::from_secs(5)).unwrap();

        let result = notifier.notify_direct("not a url", &direct()).await;
        assert!(matches!(result, Err(NotifyError::InvalidTarget(_))));
    }
}
