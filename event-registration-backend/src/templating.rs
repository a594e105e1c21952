use axum::response::Html;
use handlebars::{Handlebars, TemplateError};
use serde::Serialize;

use crate::error::AppError;
use crate::session::Identity;

// https://handlebarsjs.com/api-reference/
// https://handlebarsjs.com/guide/partials.html#partial-blocks

pub struct Templates {
    registry: Handlebars<'static>,
}

#[derive(Serialize)]
struct TemplateWrapper<'a, T> {
    signed_in: bool,
    is_admin: bool,
    is_student: bool,
    display_name: Option<&'a str>,
    #[serde(flatten)]
    inner: T,
}

impl Templates {
    pub fn new() -> Result<Self, TemplateError> {
        let mut registry = Handlebars::new();
        registry.register_partial("layout", include_str!("../templates/layout.hbs"))?;
        registry.register_template_string("home", include_str!("../templates/home.hbs"))?;
        registry.register_template_string(
            "create_event",
            include_str!("../templates/create_event.hbs"),
        )?;
        registry.register_template_string("events", include_str!("../templates/events.hbs"))?;
        Ok(Self { registry })
    }

    pub fn render<T: Serialize>(
        &self,
        template_name: &str,
        identity: &Identity,
        value: T,
    ) -> Result<Html<String>, AppError> {
        let display_name = match identity {
            Identity::Anonymous => None,
            Identity::Admin => Some("admin"),
            Identity::Student { name, .. } => Some(name.as_str()),
        };
        Ok(Html(self.registry.render(
            template_name,
            &TemplateWrapper {
                signed_in: display_name.is_some(),
                is_admin: matches!(identity, Identity::Admin),
                is_student: matches!(identity, Identity::Student { .. }),
                display_name,
                inner: value,
            },
        )?))
    }
}
