//! Server-rendered pages (askama templates under `templates/`).

use askama::Template;
use axum::{http::StatusCode, response::Html};

use crate::database::models::{
    ComplaintSummary, ComplaintWithOwner, Flash, HostelNo, Role, User,
};
use crate::error::AppError;
use crate::middleware::RequestContext;

/// Navigation and flash data every page layout needs.
#[derive(Debug, Clone, Default)]
pub struct PageChrome {
    pub logged_in: bool,
    pub is_admin: bool,
    pub email: String,
    pub messages: Vec<FlashView>,
}

#[derive(Debug, Clone)]
pub struct FlashView {
    pub kind: &'static str,
    pub message: String,
}

impl From<&Flash> for FlashView {
    fn from(flash: &Flash) -> Self {
        Self {
            kind: flash.kind.as_str(),
            message: flash.message.clone(),
        }
    }
}

impl PageChrome {
    pub fn from_context(ctx: &RequestContext) -> Self {
        let mut chrome = Self {
            messages: ctx.flash.iter().map(FlashView::from).collect(),
            ..Self::default()
        };
        if let Some(user) = &ctx.principal {
            chrome.logged_in = true;
            chrome.is_admin = user.role.is_admin();
            chrome.email = user.email.clone();
        }
        chrome
    }

    /// Adds messages produced while handling this very request.
    pub fn with_messages(mut self, flashes: &[Flash]) -> Self {
        self.messages.extend(flashes.iter().map(FlashView::from));
        self
    }
}

pub fn render<T: Template>(template: &T) -> Result<Html<String>, AppError> {
    Ok(Html(template.render()?))
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct HomeTemplate {
    pub page: PageChrome,
    pub hostel: String,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub page: PageChrome,
}

#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterTemplate {
    pub page: PageChrome,
    pub email: String,
    pub hostel_number: String,
}

#[derive(Template)]
#[template(path = "add_complaint.html")]
pub struct AddComplaintTemplate {
    pub page: PageChrome,
}

/// Row of the owner's own listing; no room or contact details.
#[derive(Debug, Clone)]
pub struct SummaryRow {
    pub title: String,
    pub description: String,
    pub status: &'static str,
}

impl From<&ComplaintSummary> for SummaryRow {
    fn from(c: &ComplaintSummary) -> Self {
        Self {
            title: c.title.clone(),
            description: c.description.clone(),
            status: c.status.as_str(),
        }
    }
}

#[derive(Template)]
#[template(path = "my_complaints.html")]
pub struct MyComplaintsTemplate {
    pub page: PageChrome,
    pub complaints: Vec<SummaryRow>,
}

/// Row of an admin listing, with full complaint details and the owner.
#[derive(Debug, Clone)]
pub struct ComplaintRow {
    pub id: String,
    pub title: String,
    pub description: String,
    pub room_no: String,
    pub mobile_no: String,
    pub roll_no: String,
    pub status: &'static str,
    pub owner_email: String,
    pub filed_at: String,
}

impl From<&ComplaintWithOwner> for ComplaintRow {
    fn from(row: &ComplaintWithOwner) -> Self {
        let c = &row.complaint;
        Self {
            id: c.id.to_string(),
            title: c.title.clone(),
            description: c.description.clone(),
            room_no: c.room_no.clone(),
            mobile_no: c.mobile_no.clone(),
            roll_no: c.roll_no.clone(),
            status: c.status.as_str(),
            owner_email: row.owner.as_ref().map(|o| o.email.clone()).unwrap_or_default(),
            filed_at: c.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

pub fn complaint_rows(rows: &[ComplaintWithOwner]) -> Vec<ComplaintRow> {
    rows.iter().map(ComplaintRow::from).collect()
}

#[derive(Template)]
#[template(path = "all_complaints.html")]
pub struct AllComplaintsTemplate {
    pub page: PageChrome,
    pub hostel: String,
    pub complaints: Vec<ComplaintRow>,
}

#[derive(Template)]
#[template(path = "resolved_complaints.html")]
pub struct ResolvedComplaintsTemplate {
    pub page: PageChrome,
    pub hostel: String,
    pub complaints: Vec<ComplaintRow>,
}

#[derive(Template)]
#[template(path = "profile.html")]
pub struct ProfileTemplate {
    pub page: PageChrome,
    pub email: String,
    pub hostel: String,
    pub role: String,
}

impl ProfileTemplate {
    pub fn new(page: PageChrome, user: &User) -> Self {
        Self {
            page,
            email: user.email.clone(),
            hostel: user.hostel_number.to_string(),
            role: user.role.to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "admin_dashboard.html")]
pub struct AdminDashboardTemplate {
    pub page: PageChrome,
    pub role: String,
    pub hostel: String,
    pub open_count: usize,
    pub resolved_count: usize,
}

impl AdminDashboardTemplate {
    pub fn new(page: PageChrome, role: Role, hostel: HostelNo, open_count: usize, resolved_count: usize) -> Self {
        Self {
            page,
            role: role.to_string(),
            hostel: hostel.to_string(),
            open_count,
            resolved_count,
        }
    }
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub page: PageChrome,
    pub status: u16,
    pub reason: String,
    pub message: String,
}

impl ErrorTemplate {
    pub fn new(status: StatusCode, message: &str) -> Self {
        Self {
            page: PageChrome::default(),
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Error").to_string(),
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_page_escapes_message() {
        let html = render(&ErrorTemplate::new(StatusCode::NOT_FOUND, "<script>x</script>")).unwrap();
        assert!(html.0.contains("404"));
        assert!(html.0.contains("Not Found"));
        assert!(!html.0.contains("<script>x</script>"));
    }

    #[test]
    fn chrome_renders_flash_messages() {
        let page = PageChrome::default().with_messages(&[Flash::error("Email already exists")]);
        let html = render(&LoginTemplate { page }).unwrap();
        assert!(html.0.contains("Email already exists"));
        assert!(html.0.contains("flash-error"));
    }
}
