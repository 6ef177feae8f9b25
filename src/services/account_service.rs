use tracing::{info, warn};
use validator::Validate;

use crate::auth::{hash_password, verify_password, TokenKeys};
use crate::db::UserRepository;
use crate::errors::AppError;
use crate::models::{LoginRequest, NewUser, NewUserDto, RegisterRequest, Role};

pub async fn register(
    users: &dyn UserRepository,
    tokens: &TokenKeys,
    input: RegisterRequest,
) -> Result<NewUserDto, AppError> {
    let input = input.normalized();
    input.validate()?;

    let user = users
        .create(
            NewUser {
                username: input.username,
                email: input.email,
                password_hash: hash_password(&input.password)?,
            },
            Role::User,
        )
        .await?;
    info!("Registered user {}", user.username);

    let token = tokens.issue(user.id, &user.username, vec![Role::User.name().to_string()])?;
    Ok(NewUserDto {
        user_name: user.username,
        email: user.email,
        token,
    })
}

pub async fn login(
    users: &dyn UserRepository,
    tokens: &TokenKeys,
    input: LoginRequest,
) -> Result<NewUserDto, AppError> {
    input.validate()?;

    let user = match users.find_by_username(input.username.trim()).await? {
        Some(user) if verify_password(&input.password, &user.password_hash) => user,
        _ => {
            warn!("Failed login for {}", input.username);
            return Err(AppError::Unauthorized);
        }
    };

    let roles = users.roles(user.id).await?;
    let token = tokens.issue(user.id, &user.username, roles)?;
    Ok(NewUserDto {
        user_name: user.username,
        email: user.email,
        token,
    })
}
