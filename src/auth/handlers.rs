use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        avatar,
        dto::{LoginRequest, LogoutResponse, PublicUser, RegisterRequest},
        jwt::{cleared_session_cookie, session_cookie, AuthUser, JwtKeys},
        password,
        repo::{Gender, NewUser},
    },
    error::ApiError,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
}

#[instrument(skip(state, jar, payload))]
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, CookieJar, Json<PublicUser>), ApiError> {
    if payload.full_name.is_empty()
        || payload.username.is_empty()
        || payload.password.is_empty()
        || payload.confirm_password.is_empty()
        || payload.gender.is_empty()
    {
        warn!("registration with missing fields");
        return Err(ApiError::Validation("all fields are required"));
    }

    if payload.password != payload.confirm_password {
        return Err(ApiError::Validation("passwords do not match"));
    }

    let gender = Gender::parse(&payload.gender).ok_or_else(|| {
        warn!(gender = %payload.gender, "unrecognized gender value");
        ApiError::Validation("unrecognized gender")
    })?;

    if state
        .store
        .find_by_username(&payload.username)
        .await?
        .is_some()
    {
        warn!(username = %payload.username, "username already taken");
        return Err(ApiError::UsernameTaken);
    }

    let password_hash = password::hash_password(&payload.password)?;
    let profile_pic = avatar::profile_pic_url(&payload.username, gender);

    // The store's unique constraint closes the race between the check above
    // and this insert; a concurrent duplicate surfaces as UsernameTaken.
    let user = state
        .store
        .insert(NewUser {
            username: payload.username,
            full_name: payload.full_name,
            password_hash,
            gender,
            profile_pic,
        })
        .await?;

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id)?;
    let jar = jar.add(session_cookie(token, keys.ttl, state.config.cookie_secure));

    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok((StatusCode::CREATED, jar, Json(PublicUser::from(user))))
}

#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<PublicUser>), ApiError> {
    // Unknown username and wrong password produce the same response so the
    // failure does not reveal whether the account exists.
    let user = state
        .store
        .find_by_username(&payload.username)
        .await?
        .ok_or_else(|| {
            warn!(username = %payload.username, "login with unknown username");
            ApiError::InvalidCredentials
        })?;

    if !password::verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login with wrong password");
        return Err(ApiError::InvalidCredentials);
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id)?;
    let jar = jar.add(session_cookie(token, keys.ttl, state.config.cookie_secure));

    info!(user_id = %user.id, username = %user.username, "user logged in");
    Ok((jar, Json(PublicUser::from(user))))
}

/// Idempotent and unconditional; the existing cookie is not even verified.
#[instrument(skip(jar))]
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<LogoutResponse>) {
    let jar = jar.add(cleared_session_cookie());
    info!("session cookie cleared");
    (jar, Json(LogoutResponse { message: "logged out" }))
}

#[instrument(skip(state))]
pub async fn me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PublicUser>, ApiError> {
    let user = state.store.find_by_id(user_id).await?.ok_or_else(|| {
        warn!(user_id = %user_id, "session user no longer exists");
        ApiError::NotFound
    })?;

    Ok(Json(PublicUser::from(user)))
}
