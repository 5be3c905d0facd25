mod common;

use chrono::NaiveDate;
use common::TestApp;
use offerboard::entities::{offer, OfferStatus};
use offerboard::services::dashboard::DashboardFilter;
use offerboard::services::preferences::DEFAULT_DASHBOARD_COLUMNS;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, Set};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("invalid test date")
}

#[allow(clippy::too_many_arguments)]
async fn seed_offer(
    app: &TestApp,
    number: &str,
    client_id: i32,
    status: OfferStatus,
    created_at: NaiveDate,
    valid_until: NaiveDate,
    price: Decimal,
    cost: Decimal,
) -> offer::Model {
    offer::ActiveModel {
        offer_number: Set(number.to_string()),
        price: Set(price),
        cost: Set(cost),
        created_at: Set(created_at),
        valid_until: Set(valid_until),
        status: Set(status),
        client_id: Set(client_id),
        ..Default::default()
    }
    .insert(&*app.state.db)
    .await
    .expect("failed to seed offer")
}

async fn seed_client(app: &TestApp, name: &str) -> i32 {
    app.state
        .services
        .clients
        .create_client(name, "")
        .await
        .expect("failed to seed client")
        .id
}

#[tokio::test]
async fn no_criteria_returns_all_newest_first_with_stable_ties() {
    let app = TestApp::new().await;
    let acme = seed_client(&app, "Acme").await;

    let jan = date(2024, 1, 10);
    let feb = date(2024, 2, 10);
    let horizon = date(2024, 12, 31);
    let first = seed_offer(&app, "OF-1", acme, OfferStatus::Draft, jan, horizon, dec!(100), dec!(50)).await;
    let second = seed_offer(&app, "OF-2", acme, OfferStatus::Draft, feb, horizon, dec!(100), dec!(50)).await;
    let third = seed_offer(&app, "OF-3", acme, OfferStatus::Draft, feb, horizon, dec!(100), dec!(50)).await;

    let data = app
        .state
        .services
        .dashboard
        .query(&DashboardFilter::default())
        .await
        .unwrap();

    let ids: Vec<i32> = data.offers.iter().map(|row| row.offer.id).collect();
    // created_at descending, ties broken by id descending.
    assert_eq!(ids, vec![third.id, second.id, first.id]);
    assert_eq!(data.totals.count, 3);
}

#[tokio::test]
async fn criteria_compose_conjunctively() {
    let app = TestApp::new().await;
    let acme = seed_client(&app, "Acme").await;
    let horizon = date(2024, 12, 31);

    seed_offer(&app, "OF-1", acme, OfferStatus::Sent, date(2024, 1, 5), horizon, dec!(10), dec!(5)).await;
    let matching = seed_offer(&app, "OF-2", acme, OfferStatus::Sent, date(2024, 2, 5), horizon, dec!(10), dec!(5)).await;
    seed_offer(&app, "OF-3", acme, OfferStatus::Draft, date(2024, 2, 6), horizon, dec!(10), dec!(5)).await;

    let filter = DashboardFilter {
        statuses: vec![OfferStatus::Sent],
        created_from: Some(date(2024, 2, 1)),
        created_to: Some(date(2024, 2, 28)),
        ..Default::default()
    };
    let data = app.state.services.dashboard.query(&filter).await.unwrap();

    let ids: Vec<i32> = data.offers.iter().map(|row| row.offer.id).collect();
    assert_eq!(ids, vec![matching.id], "only the offer satisfying both criteria matches");
}

#[tokio::test]
async fn status_filter_is_a_set_membership_test() {
    let app = TestApp::new().await;
    let acme = seed_client(&app, "Acme").await;
    let horizon = date(2024, 12, 31);

    seed_offer(&app, "OF-1", acme, OfferStatus::Draft, date(2024, 1, 1), horizon, dec!(10), dec!(5)).await;
    let won = seed_offer(&app, "OF-2", acme, OfferStatus::Won, date(2024, 1, 2), horizon, dec!(10), dec!(5)).await;

    let filter = DashboardFilter {
        statuses: vec![OfferStatus::Won, OfferStatus::Lost],
        ..Default::default()
    };
    let data = app.state.services.dashboard.query(&filter).await.unwrap();

    assert_eq!(data.offers.len(), 1);
    assert_eq!(data.offers[0].offer.id, won.id);
}

#[tokio::test]
async fn date_bounds_are_inclusive() {
    let app = TestApp::new().await;
    let acme = seed_client(&app, "Acme").await;

    let created = date(2024, 3, 15);
    let valid = date(2024, 4, 15);
    seed_offer(&app, "OF-1", acme, OfferStatus::Draft, created, valid, dec!(10), dec!(5)).await;

    let exact = DashboardFilter {
        created_from: Some(created),
        created_to: Some(created),
        valid_from: Some(valid),
        valid_to: Some(valid),
        ..Default::default()
    };
    let data = app.state.services.dashboard.query(&exact).await.unwrap();
    assert_eq!(data.totals.count, 1, "boundary dates are part of the range");

    let outside = DashboardFilter {
        created_from: Some(date(2024, 3, 16)),
        ..Default::default()
    };
    let data = app.state.services.dashboard.query(&outside).await.unwrap();
    assert_eq!(data.totals.count, 0);
}

#[tokio::test]
async fn client_criterion_scopes_to_one_client() {
    let app = TestApp::new().await;
    let acme = seed_client(&app, "Acme").await;
    let globex = seed_client(&app, "Globex").await;
    let horizon = date(2024, 12, 31);

    seed_offer(&app, "OF-1", acme, OfferStatus::Draft, date(2024, 1, 1), horizon, dec!(10), dec!(5)).await;
    let globex_offer = seed_offer(&app, "OF-2", globex, OfferStatus::Draft, date(2024, 1, 2), horizon, dec!(10), dec!(5)).await;

    let filter = DashboardFilter {
        client_id: Some(globex),
        ..Default::default()
    };
    let data = app.state.services.dashboard.query(&filter).await.unwrap();
    assert_eq!(data.offers.len(), 1);
    assert_eq!(data.offers[0].offer.id, globex_offer.id);
    assert_eq!(
        data.offers[0].client.as_ref().map(|c| c.name.as_str()),
        Some("Globex")
    );
}

#[tokio::test]
async fn totals_and_status_summary_cover_the_filtered_set() {
    let app = TestApp::new().await;
    let acme = seed_client(&app, "Acme").await;
    let horizon = date(2024, 12, 31);

    seed_offer(&app, "OF-1", acme, OfferStatus::Won, date(2024, 1, 1), horizon, dec!(1000), dec!(600)).await;
    seed_offer(&app, "OF-2", acme, OfferStatus::Won, date(2024, 1, 2), horizon, dec!(500), dec!(100)).await;
    seed_offer(&app, "OF-3", acme, OfferStatus::Sent, date(2024, 1, 3), horizon, dec!(250), dec!(250)).await;

    let data = app
        .state
        .services
        .dashboard
        .query(&DashboardFilter::default())
        .await
        .unwrap();

    assert_eq!(data.totals.count, 3);
    assert_eq!(data.totals.value, dec!(1750));
    assert_eq!(data.totals.cost, dec!(950));
    assert_eq!(data.totals.margin, dec!(800));

    let statuses: Vec<OfferStatus> = data.status_summary.iter().map(|s| s.status).collect();
    assert_eq!(
        statuses,
        vec![
            OfferStatus::Draft,
            OfferStatus::Sent,
            OfferStatus::Won,
            OfferStatus::Lost,
        ],
        "every status appears, in enumeration order"
    );
    let counts: Vec<u64> = data.status_summary.iter().map(|s| s.count).collect();
    assert_eq!(counts, vec![0, 1, 2, 0]);
    assert_eq!(counts.iter().sum::<u64>(), data.totals.count);
}

#[tokio::test]
async fn empty_store_aggregates_to_zero() {
    let app = TestApp::new().await;

    let data = app
        .state
        .services
        .dashboard
        .query(&DashboardFilter::default())
        .await
        .unwrap();
    assert_eq!(data.totals.count, 0);
    assert_eq!(data.totals.value, Decimal::ZERO);
    assert_eq!(data.totals.cost, Decimal::ZERO);
    assert_eq!(data.totals.margin, Decimal::ZERO);
    assert!(data.offers.is_empty());
}

#[tokio::test]
async fn column_preferences_round_trip_per_session() {
    let app = TestApp::new().await;
    let preferences = &app.state.services.preferences;

    let defaults = preferences
        .get("session-a", &DEFAULT_DASHBOARD_COLUMNS)
        .await
        .unwrap();
    assert_eq!(defaults, DEFAULT_DASHBOARD_COLUMNS.map(String::from).to_vec());

    let chosen = vec!["offer_number".to_string(), "status".to_string()];
    preferences.set("session-a", &chosen).await.unwrap();
    preferences
        .set("session-a", &chosen)
        .await
        .expect("overwriting an existing preference failed");

    assert_eq!(
        preferences
            .get("session-a", &DEFAULT_DASHBOARD_COLUMNS)
            .await
            .unwrap(),
        chosen
    );

    // Another session still sees the default.
    assert_eq!(
        preferences
            .get("session-b", &DEFAULT_DASHBOARD_COLUMNS)
            .await
            .unwrap(),
        DEFAULT_DASHBOARD_COLUMNS.map(String::from).to_vec()
    );
}

#[tokio::test]
async fn preferences_do_not_affect_query_results() {
    let app = TestApp::new().await;
    let acme = seed_client(&app, "Acme").await;
    seed_offer(
        &app,
        "OF-1",
        acme,
        OfferStatus::Draft,
        date(2024, 1, 1),
        date(2024, 1, 31),
        dec!(100),
        dec!(40),
    )
    .await;

    let before = app
        .state
        .services
        .dashboard
        .query(&DashboardFilter::default())
        .await
        .unwrap();

    app.state
        .services
        .preferences
        .set("session-a", &["margin".to_string()])
        .await
        .unwrap();

    let after = app
        .state
        .services
        .dashboard
        .query(&DashboardFilter::default())
        .await
        .unwrap();

    assert_eq!(before.totals, after.totals);
    assert_eq!(before.status_summary, after.status_summary);
}
