use crate::dom::Dom;
use crate::models::{Activity, ActivityId, Details};
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowTarget {
    Delete,
    Body,
}

#[derive(Debug, Default)]
pub struct ListSync {
    rendered: Vec<ActivityId>,
}

impl ListSync {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rendered_ids(&self) -> &[ActivityId] {
        &self.rendered
    }

    pub fn is_rendered(&self, id: &ActivityId) -> bool {
        self.rendered.contains(id)
    }

    /// Appends a row for `activity`; rows are never updated in place.
    pub fn render<D: Dom>(&mut self, dom: &mut D, activity: &Activity) -> bool {
        if self.is_rendered(activity.id()) {
            return false;
        }
        dom.insert_row(activity.id(), render_row(activity));
        self.rendered.push(activity.id().clone());
        true
    }

    pub fn remove<D: Dom>(&mut self, dom: &mut D, id: &ActivityId) -> bool {
        self.rendered.retain(|rendered| rendered != id);
        dom.remove_row(id)
    }

    pub fn clear<D: Dom>(&mut self, dom: &mut D) {
        for id in std::mem::take(&mut self.rendered) {
            dom.remove_row(&id);
        }
    }
}

pub fn render_row(activity: &Activity) -> String {
    let kind = activity.kind();
    let mut html = format!(
        r#"<li class="workout workout--{kind_class}" data-id="{id}">
  <h2 class="workout__title">{description}<button class="remove-btn">X</button></h2>
"#,
        kind_class = kind.as_str(),
        id = escape(activity.id().as_str()),
        description = escape(activity.description()),
    );
    detail(&mut html, kind.icon(), &activity.distance_km().to_string(), "km");
    detail(&mut html, "⏱", &activity.duration_min().to_string(), "min");
    match activity.details() {
        Details::Running {
            cadence_spm,
            pace_min_per_km,
        } => {
            detail(&mut html, "⚡️", &format!("{pace_min_per_km:.1}"), "min/km");
            detail(&mut html, "🦶🏼", &cadence_spm.to_string(), "spm");
        }
        Details::Cycling {
            elevation_gain_m,
            speed_km_per_h,
        } => {
            detail(&mut html, "⚡️", &format!("{speed_km_per_h:.1}"), "km/h");
            detail(&mut html, "⛰", &elevation_gain_m.to_string(), "m");
        }
    }
    html.push_str("</li>\n");
    html
}

fn detail(html: &mut String, icon: &str, value: &str, unit: &str) {
    let _ = write!(
        html,
        r#"  <div class="workout__details">
    <span class="workout__icon">{icon}</span>
    <span class="workout__value">{value}</span>
    <span class="workout__unit">{unit}</span>
  </div>
"#
    );
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
