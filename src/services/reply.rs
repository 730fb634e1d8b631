//! Reply text composition.
//!
//! Typed composers for the notification replies posted to tickets. Each
//! composer takes named fields and renders the full text, so there is no
//! positional template filling to get out of order.

const BANNER: &str =
    "--------------------------------------------------------------------------------";

/// Reply posted when a code review is assigned.
#[derive(Debug, Clone)]
pub struct AssignedReply<'a> {
    /// Display name of the resolved reviewer.
    pub reviewer: &'a str,
    /// Pull request web URL.
    pub url: &'a str,
    pub title: &'a str,
    pub body: &'a str,
}

impl AssignedReply<'_> {
    pub fn render(&self) -> String {
        format!(
            "\n{banner}\nCode Review Assigned to: {reviewer}\nPull Request: {url}\n{banner}\n\n{title}\n\n{body}\n",
            banner = BANNER,
            reviewer = self.reviewer,
            url = self.url,
            title = self.title,
            body = self.body,
        )
    }
}

/// Reply posted when an assigned pull request is edited.
#[derive(Debug, Clone)]
pub struct EditedReply<'a> {
    /// Display name of the current reviewer.
    pub reviewer: &'a str,
    /// Pull request web URL.
    pub url: &'a str,
    /// Names of the fields that changed, in delivery order.
    pub changed_fields: &'a [String],
    pub title: &'a str,
    pub body: &'a str,
}

impl EditedReply<'_> {
    pub fn render(&self) -> String {
        format!(
            "\n{banner}\nCode Review Assigned to: {reviewer}\nPull Request: {url}\n{banner}\n\nThe pull request was updated. Please follow the link to see the changes to the {changed}.\n\n{title}\n\n{body}\n",
            banner = BANNER,
            reviewer = self.reviewer,
            url = self.url,
            changed = self.changed_fields.join(" and "),
            title = self.title,
            body = self.body,
        )
    }
}
