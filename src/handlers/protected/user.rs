// handlers/protected/user.rs - GET /user/profile

use axum::{response::Html, Extension};

use crate::error::AppError;
use crate::middleware::{Principal, RequestContext};
use crate::views::{self, PageChrome, ProfileTemplate};

pub async fn profile(
    Extension(ctx): Extension<RequestContext>,
    Extension(Principal(user)): Extension<Principal>,
) -> Result<Html<String>, AppError> {
    views::render(&ProfileTemplate::new(PageChrome::from_context(&ctx), &user))
}
