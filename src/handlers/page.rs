//! Server-rendered admin page for the warehouse module.
//!
//! The page carries the warehouse table, the status filter, and the
//! create/edit modal; `static/app.js` drives everything else through the
//! JSON API.

use crate::{
    errors::ServiceError,
    handlers::AppState,
    services::warehouses::{ManagerSummary, StatusFilter, WarehouseSummary},
};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
};
use serde::Deserialize;
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::error;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub status: Option<String>,
}

/// Renders the admin page. Database failures render an HTML error panel
/// instead of a JSON body, since this is the one browser-facing route.
pub async fn index(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> impl IntoResponse {
    let filter = StatusFilter::from_query(query.status.as_deref());

    let warehouses = match state.warehouses.list(filter).await {
        Ok(rows) => rows,
        Err(err) => return error_panel(&err),
    };
    let managers = match state.warehouses.list_managers().await {
        Ok(rows) => rows,
        Err(err) => return error_panel(&err),
    };

    (
        StatusCode::OK,
        Html(render_index(&warehouses, &managers, filter)),
    )
        .into_response()
}

fn error_panel(err: &ServiceError) -> axum::response::Response {
    error!("Failed to render the warehouse page: {}", err);
    let body = format!(
        "<!DOCTYPE html><html><body style=\"font-family:sans-serif;padding:2rem;\">\
         <h2 style=\"color:#c0392b;\">&#9888; Database error</h2>\
         <p>{}</p>\
         </body></html>",
        escape(&err.response_message())
    );
    (err.status_code(), Html(body)).into_response()
}

/// Minimal HTML escaping for text interpolated into the page.
fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn render_index(
    warehouses: &[WarehouseSummary],
    managers: &[ManagerSummary],
    filter: StatusFilter,
) -> String {
    let total = warehouses.len();
    let active = warehouses.iter().filter(|w| w.active).count();
    let inactive = total - active;

    let filter_button = |value: StatusFilter, label: &str| {
        format!(
            "<a class=\"filter-btn{}\" href=\"/?status={}\">{}</a>",
            if filter == value { " active" } else { "" },
            value.as_str(),
            label
        )
    };

    let mut rows = String::new();
    if warehouses.is_empty() {
        rows.push_str(
            "<tr><td colspan=\"8\"><div class=\"empty-state\">\
             <strong>No warehouses registered</strong>\
             <p>Click \"+ New warehouse\" to get started.</p>\
             </div></td></tr>",
        );
    } else {
        for w in warehouses {
            let managers_cell = match &w.managers_names {
                Some(names) => escape(names).replace(" / ", "<br>"),
                None => "<span class=\"muted\">Unassigned</span>".to_string(),
            };
            let badge = if w.active {
                "<span class=\"badge badge-active\">Active</span>"
            } else {
                "<span class=\"badge badge-inactive\">Inactive</span>"
            };
            let _ = write!(
                rows,
                "<tr data-id=\"{id}\">\
                 <td class=\"td-code\">{code}</td>\
                 <td>{name}</td>\
                 <td>{address}</td>\
                 <td>{staff}</td>\
                 <td>{managers}</td>\
                 <td class=\"td-date\">{date}<br><small>{time}</small></td>\
                 <td>{badge}</td>\
                 <td class=\"td-actions\">\
                 <button class=\"btn-icon btn-edit\" data-id=\"{id}\" title=\"Edit warehouse\">&#9998;</button>\
                 <button class=\"btn-icon btn-delete\" data-id=\"{id}\" data-name=\"{name}\" title=\"Delete warehouse\">&#128465;</button>\
                 </td></tr>",
                id = w.id,
                code = escape(&w.code),
                name = escape(&w.name),
                address = escape(&w.address),
                staff = w.staff_count,
                managers = managers_cell,
                date = w.created_at.format("%d/%m/%Y"),
                time = w.created_at.format("%H:%M:%S"),
            );
        }
    }

    let mut manager_options = String::new();
    for m in managers {
        let _ = write!(
            manager_options,
            "<label class=\"manager-option\">\
             <input type=\"checkbox\" name=\"managerIds\" value=\"{id}\">\
             {name} <small class=\"muted\">({rut})</small>\
             </label>",
            id = m.id,
            name = escape(&m.full_name()),
            rut = escape(&m.rut),
        );
    }

    format!(
        "<!DOCTYPE html>\
<html lang=\"en\">\
<head>\
<meta charset=\"UTF-8\">\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\
<title>Warehouse administration</title>\
<link rel=\"stylesheet\" href=\"/static/app.css\">\
</head>\
<body>\
<header class=\"app-header\"><span class=\"app-header__title\">Warehouse administration</span></header>\
<main class=\"container\">\
<div class=\"stats-bar\">\
<div class=\"stat-chip\">Total: <strong id=\"stat-total\">{total}</strong></div>\
<div class=\"stat-chip stat-active\">Active: <strong id=\"stat-active\">{active}</strong></div>\
<div class=\"stat-chip stat-inactive\">Inactive: <strong id=\"stat-inactive\">{inactive}</strong></div>\
</div>\
<div class=\"toolbar\">\
<div class=\"toolbar__left\">\
<span class=\"toolbar__title\">Warehouses</span>\
<div class=\"filter-group\" role=\"group\" aria-label=\"Filter by status\">{f_all}{f_active}{f_inactive}</div>\
</div>\
<button class=\"btn btn-primary\" id=\"btn-new-warehouse\">+ New warehouse</button>\
</div>\
<div class=\"card\"><div class=\"table-wrapper\"><table>\
<thead><tr>\
<th>Code</th><th>Name</th><th>Address</th><th>Staff</th><th>Manager(s)</th>\
<th>Created</th><th>Status</th><th style=\"text-align:center;\">Actions</th>\
</tr></thead>\
<tbody id=\"warehouse-rows\">{rows}</tbody>\
</table></div></div>\
</main>\
<div class=\"modal-backdrop\" id=\"modal-warehouse\" role=\"dialog\" aria-modal=\"true\">\
<div class=\"modal\">\
<div class=\"modal__header\"><h2 id=\"modal-title\">New warehouse</h2>\
<button class=\"modal__close\" aria-label=\"Close\">&#10005;</button></div>\
<form id=\"form-warehouse\" novalidate>\
<input type=\"hidden\" name=\"id\">\
<div class=\"modal__body\"><div class=\"form-grid\">\
<div class=\"form-group\" data-field=\"code\">\
<label for=\"field-code\">Code <span class=\"req\">*</span></label>\
<input type=\"text\" id=\"field-code\" name=\"code\" maxlength=\"5\" autocomplete=\"off\">\
<span class=\"field-error\"></span></div>\
<div class=\"form-group\" data-field=\"name\">\
<label for=\"field-name\">Name <span class=\"req\">*</span></label>\
<input type=\"text\" id=\"field-name\" name=\"name\" maxlength=\"100\">\
<span class=\"field-error\"></span></div>\
<div class=\"form-group\" data-field=\"address\">\
<label for=\"field-address\">Address <span class=\"req\">*</span></label>\
<input type=\"text\" id=\"field-address\" name=\"address\">\
<span class=\"field-error\"></span></div>\
<div class=\"form-group\" data-field=\"staffCount\">\
<label for=\"field-staff-count\">Staff count <span class=\"req\">*</span></label>\
<input type=\"text\" id=\"field-staff-count\" name=\"staffCount\" inputmode=\"numeric\">\
<span class=\"field-error\"></span></div>\
<div class=\"form-group\" data-field=\"managers\">\
<label>Manager(s) <span class=\"req\">*</span></label>\
<div class=\"manager-list\">{manager_options}</div>\
<span class=\"field-error\"></span></div>\
<div class=\"form-group form-group--checkbox\" data-field=\"active\">\
<label><input type=\"checkbox\" name=\"active\"> Active</label></div>\
</div></div>\
<div class=\"modal__footer\">\
<button type=\"button\" class=\"btn btn-secondary\" id=\"btn-cancel\">Cancel</button>\
<button type=\"submit\" class=\"btn btn-primary\" id=\"btn-save\">Save</button>\
</div>\
</form></div></div>\
<div id=\"toast-container\" aria-live=\"polite\"></div>\
<script>window.__statusFilter = \"{filter}\";</script>\
<script src=\"/static/app.js\"></script>\
</body></html>",
        total = total,
        active = active,
        inactive = inactive,
        f_all = filter_button(StatusFilter::All, "All"),
        f_active = filter_button(StatusFilter::Active, "Active"),
        f_inactive = filter_button(StatusFilter::Inactive, "Inactive"),
        rows = rows,
        manager_options = manager_options,
        filter = filter.as_str(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_neutralizes_markup() {
        assert_eq!(escape("<b>&\"'"), "&lt;b&gt;&amp;&quot;&#39;");
    }

    #[test]
    fn renders_empty_state_and_filter() {
        let html = render_index(&[], &[], StatusFilter::Active);
        assert!(html.contains("No warehouses registered"));
        assert!(html.contains("filter-btn active"));
        assert!(html.contains("__statusFilter = \"active\""));
    }
}
