use crate::core::error::Result;
use crate::features::auth::clients::{IdentityClient, IdentitySession, IdentityUser, SignupOutcome};
use crate::features::auth::dtos::{
    AuthUserDto, MeResponseDto, OtpRequestDto, PasswordAuthRequestDto, RefreshTokenRequestDto,
    SessionResponseDto, SignupResponseDto, VerifyOtpRequestDto,
};
use crate::features::auth::model::AuthenticatedUser;
use std::sync::Arc;

/// Relays sign-in flows to the hosted identity backend
pub struct AuthService {
    identity_client: Arc<IdentityClient>,
}

impl AuthService {
    pub fn new(identity_client: Arc<IdentityClient>) -> Self {
        Self { identity_client }
    }

    pub async fn request_otp(&self, dto: OtpRequestDto) -> Result<()> {
        self.identity_client
            .send_otp(&dto.email, dto.redirect_to.as_deref())
            .await
    }

    pub async fn verify_otp(&self, dto: VerifyOtpRequestDto) -> Result<SessionResponseDto> {
        let session = self
            .identity_client
            .verify_otp(&dto.token_hash, &dto.kind)
            .await?;
        Ok(session.into())
    }

    pub async fn sign_up(&self, dto: PasswordAuthRequestDto) -> Result<SignupResponseDto> {
        let outcome = self
            .identity_client
            .sign_up(&dto.email, &dto.password)
            .await?;

        Ok(match outcome {
            SignupOutcome::Session(session) => SignupResponseDto {
                user: session.user.clone().into(),
                session: Some(session.into()),
                confirmation_required: false,
            },
            SignupOutcome::PendingConfirmation(user) => SignupResponseDto {
                user: user.into(),
                session: None,
                confirmation_required: true,
            },
        })
    }

    pub async fn login(&self, dto: PasswordAuthRequestDto) -> Result<SessionResponseDto> {
        let session = self
            .identity_client
            .sign_in_with_password(&dto.email, &dto.password)
            .await?;
        Ok(session.into())
    }

    pub async fn refresh_token(&self, dto: RefreshTokenRequestDto) -> Result<SessionResponseDto> {
        let session = self
            .identity_client
            .refresh_session(&dto.refresh_token)
            .await?;
        Ok(session.into())
    }

    pub fn current_user(&self, user: AuthenticatedUser) -> MeResponseDto {
        user.into()
    }
}

impl From<IdentityUser> for AuthUserDto {
    fn from(user: IdentityUser) -> Self {
        Self {
            id: user.id,
            email: user.email,
            email_confirmed: user.email_confirmed_at.is_some(),
        }
    }
}

impl From<IdentitySession> for SessionResponseDto {
    fn from(session: IdentitySession) -> Self {
        Self {
            access_token: session.access_token,
            token_type: session.token_type,
            expires_in: session.expires_in,
            refresh_token: session.refresh_token,
            user: session.user.into(),
        }
    }
}
