//! Route handlers.

use alloy_primitives::{Address, U256};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue, header},
    response::{Html, IntoResponse, Response},
};
use gitpay_chain::{DonationStats, TaggedTransfer, ens, stats::display_amount, token};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    error::ServerError,
    page,
    state::AppState,
    svg::{self, Theme},
};

/// The tuple every renderer consumes: subject, token metadata, balance, stats and
/// the ordered donation list.
#[derive(Clone, Debug)]
pub struct ProfileView {
    pub subject: Address,
    pub display_name: Option<String>,
    pub token: token::TokenMetadata,
    pub balance: U256,
    pub stats: DonationStats,
    pub transfers: Vec<TaggedTransfer>,
}

impl ProfileView {
    /// Display name when one resolves, shortened address otherwise.
    pub fn title(&self) -> String {
        self.display_name.clone().unwrap_or_else(|| svg::short_address(self.subject))
    }
}

#[derive(Debug, Deserialize)]
pub struct ThemeParams {
    theme: Option<String>,
}

pub async fn health() -> &'static str {
    "ok"
}

/// `GET /badge/{name}`: the compact summary badge.
pub async fn badge(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<ThemeParams>,
) -> Result<Response, ServerError> {
    let view = load_profile(&state, &name).await?;
    let body = svg::render_badge(&view, Theme::from_query(params.theme.as_deref()), state.summary_limit);
    Ok(svg_response(body, state.cache_ttl))
}

/// `GET /history/{name}`: the full donation list image.
pub async fn history(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<ThemeParams>,
) -> Result<Response, ServerError> {
    let view = load_profile(&state, &name).await?;
    let body = svg::render_history(&view, Theme::from_query(params.theme.as_deref()), state.list_limit);
    Ok(svg_response(body, state.cache_ttl))
}

#[derive(Debug, Serialize)]
struct DonationsDocument {
    address: Address,
    #[serde(skip_serializing_if = "Option::is_none")]
    display_name: Option<String>,
    token: token::TokenMetadata,
    #[serde(serialize_with = "gitpay_primitives::ser::u256_decimal")]
    balance: U256,
    balance_display: String,
    stats: DonationStats,
    donations: Vec<TaggedTransfer>,
}

/// `GET /api/donations/{name}`: the same tuple the images render, as JSON.
pub async fn donations(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Response, ServerError> {
    let view = load_profile(&state, &name).await?;
    let document = DonationsDocument {
        address: view.subject,
        display_name: view.display_name,
        balance_display: display_amount(view.balance, view.token.decimals),
        balance: view.balance,
        token: view.token,
        stats: view.stats,
        donations: view.transfers,
    };

    let mut response = Json(document).into_response();
    insert_cache_control(response.headers_mut(), state.cache_ttl);
    Ok(response)
}

/// `GET /donate/{name}`: the wallet-driving donation page.
pub async fn donate(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Response, ServerError> {
    let provider = state.provider();
    let recipient = ens::resolve_subject(provider, &name).await?;
    let token = token::metadata(provider.clone(), state.token).await?;

    let body = page::render_donate_page(&name, recipient, &token, state.chain_id);
    let mut response = Html(body).into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    Ok(response)
}

/// Resolves the subject and assembles everything the renderers need.
///
/// Reverse resolution only runs when the caller passed a raw address; when they
/// passed a name, the name itself is the display name.
async fn load_profile(state: &AppState, name: &str) -> Result<ProfileView, ServerError> {
    let provider = state.provider();
    let subject = ens::resolve_subject(provider, name).await?;

    let display_name = if name.parse::<Address>().is_ok() {
        ens::display_name(provider, subject).await
    } else {
        Some(name.to_string())
    };

    let token = token::metadata(provider.clone(), state.token).await?;
    let balance = token::balance_of(provider.clone(), state.token, subject).await?;
    let transfers = state.scanner().scan(subject).await?;
    let stats = DonationStats::compute(subject, &transfers, token.decimals);

    info!(
        subject = %subject,
        donations = transfers.len(),
        received = stats.received_count,
        "profile assembled"
    );

    Ok(ProfileView { subject, display_name, token, balance, stats, transfers })
}

fn svg_response(body: String, cache_ttl: u64) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("image/svg+xml; charset=utf-8"),
    );
    insert_cache_control(&mut headers, cache_ttl);
    (headers, body).into_response()
}

fn insert_cache_control(headers: &mut HeaderMap, cache_ttl: u64) {
    if let Ok(value) = HeaderValue::from_str(&format!("public, max-age={cache_ttl}")) {
        headers.insert(header::CACHE_CONTROL, value);
    }
}
