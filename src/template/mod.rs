use crate::{error::Result, pull_request::PullRequest};
use chrono::{DateTime, Utc};
use handlebars::{
    no_escape, Context, Handlebars, Helper, HelperResult, Output, RenderContext,
    RenderErrorReason,
};
use std::fmt::Write;

const DIGEST_TEMPLATE: &str = "digest";
const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// A compiled digest template. The template is rendered against the list of
/// pull requests, so it usually iterates `this`:
///
/// ```text
/// {{#each this}}<{{url}}|{{title}}> by {{author.username}} ({{date created_at}})
/// {{/each}}
/// ```
///
/// Unknown references fail the render, and output is never escaped.
pub struct Renderer {
    hb: Handlebars<'static>,
}

impl Renderer {
    pub fn new(template: &str) -> Result<Self> {
        let mut hb = Handlebars::new();
        hb.set_strict_mode(true);
        hb.register_escape_fn(no_escape);
        hb.register_helper("date", Box::new(date_helper));

        hb.register_template_string(DIGEST_TEMPLATE, template)?;

        Ok(Renderer { hb })
    }

    /// Renders `pull_requests` in the order given.
    pub fn render(&self, pull_requests: &[PullRequest]) -> Result<String> {
        let rendered = self.hb.render(DIGEST_TEMPLATE, &pull_requests)?;
        Ok(rendered)
    }
}

/// Compiles `template` and renders `pull_requests` with it in one go.
#[allow(dead_code)]
pub fn render(template: &str, pull_requests: &[PullRequest]) -> Result<String> {
    Renderer::new(template)?.render(pull_requests)
}

fn date_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let timestamp = h
        .param(0)
        .ok_or(RenderErrorReason::ParamNotFoundForIndex("date", 0))?
        .value()
        .as_str()
        .and_then(|value| DateTime::parse_from_rfc3339(value).ok())
        .ok_or_else(|| {
            RenderErrorReason::ParamTypeMismatchForName(
                "date",
                "timestamp".to_owned(),
                "rfc3339 string".to_owned(),
            )
        })?;

    let format = h
        .param(1)
        .and_then(|v| v.value().as_str())
        .unwrap_or(DEFAULT_DATE_FORMAT);

    let mut formatted = String::new();
    write!(formatted, "{}", timestamp.with_timezone(&Utc).format(format))
        .map_err(|_| RenderErrorReason::Other(format!("invalid date format: {}", format)))?;

    out.write(&formatted)?;
    Ok(())
}
