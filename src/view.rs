use askama::Template;
use chrono::Local;

use crate::error::Result;
use crate::user::User;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {}

#[derive(Template)]
#[template(path = "user.html")]
pub struct UserTemplate<'a> {
    pub user: &'a User,
    pub fetched_at: String,
}

pub fn render_index() -> Result<String> {
    Ok(IndexTemplate {}.render()?)
}

pub fn render_user(user: &User) -> Result<String> {
    let page = UserTemplate {
        user,
        fetched_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
    };
    Ok(page.render()?)
}
