use serde_json::Value;

use super::Markup;
use crate::api::{json_scalar, CopyAction, DestinationStatus};
use crate::controller::{DetailScreen, ResultScreen, Screen, ViewController, OVERWRITE_PROMPT};

const TITLE: &str = "n8n Workflow Copier";

const STYLE: &str = r#"<style>
body { font-family: sans-serif; max-width: 1100px; margin: 40px auto; padding: 0 20px; color: #222; }
button { padding: 10px 20px; border: none; border-radius: 5px; background: #2196f3; color: white; cursor: pointer; font-size: 14px; }
button:disabled { background: #9e9e9e; cursor: default; }
.workflow-item { padding: 10px; border: 1px solid #ddd; border-radius: 5px; margin: 5px 0; cursor: pointer; }
#error-message { color: #d32f2f; font-weight: bold; }
#in-progress { font-style: italic; color: #666; display: flex; gap: 10px; align-items: center; }
pre { white-space: pre-wrap; word-break: break-word; }
</style>"#;

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Whole page for the controller's current screen.
pub fn render_page(controller: &ViewController) -> Markup {
    let mut page = Markup::raw("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>");
    page.push_text(TITLE)
        .push_raw("</title>\n")
        .push_raw(STYLE)
        .push_raw("\n</head>\n<body>\n<h1>")
        .push_text(TITLE)
        .push_raw("</h1>\n");

    let busy = controller.is_loading();
    if busy {
        page.push(in_progress_notice());
    }
    page.push_raw("<p id=\"error-message\">");
    if let Some(error) = controller.error() {
        page.push_text(error);
    }
    page.push_raw("</p>\n<div id=\"workflow-list-container\">\n");

    match controller.screen() {
        Screen::Initial => page.push(initial(busy)),
        Screen::WorkflowList => page.push(workflow_list(controller, busy)),
        Screen::Detail(detail) => page.push(detail_screen(
            detail,
            controller.awaiting_confirmation(),
            busy,
        )),
        Screen::Copied(result) => page.push(result_screen(result)),
    };

    page.push_raw("</div>\n</body>\n</html>\n");
    page
}

fn button(label: &'static str, disabled: bool) -> Markup {
    let mut markup = Markup::raw("<button type=\"submit\"");
    if disabled {
        markup.push_raw(" disabled");
    }
    markup.push_raw(">").push_raw(label).push_raw("</button>");
    markup
}

/// Shown when this session still has a request running, e.g. one started
/// from another tab or one whose page was left before it finished. Start
/// Over stays enabled so the session can always be abandoned.
fn in_progress_notice() -> Markup {
    let mut markup = Markup::raw(
        "<div id=\"in-progress\"><span>A request for this session is still in progress. Reload the page to see its result.</span><form method=\"post\" action=\"/ui/restart\">",
    );
    markup
        .push(button("Start Over", false))
        .push_raw("</form></div>\n");
    markup
}

fn fetch_form(busy: bool) -> Markup {
    let mut form = Markup::raw("<form method=\"post\" action=\"/ui/workflows\">");
    form.push(button("Fetch Workflows", busy)).push_raw("</form>\n");
    form
}

fn initial(busy: bool) -> Markup {
    let mut markup = Markup::raw(
        "<p id=\"initial-instruction\">Fetch the active workflows of the source instance to choose one to copy.</p>\n",
    );
    markup.push(fetch_form(busy));
    markup
}

fn workflow_list(controller: &ViewController, busy: bool) -> Markup {
    let mut markup = fetch_form(busy);
    let workflows = &controller.session().workflows;
    if workflows.is_empty() {
        markup.push_raw("<p>No active workflows found to copy.</p>\n");
        return markup;
    }

    markup.push_raw("<form id=\"workflow-form\" method=\"post\" action=\"/ui/continue\">\n");
    for workflow in workflows {
        let checked = controller.selection_draft() == Some(workflow.id.as_str());
        markup
            .push_raw("<div class=\"workflow-item\"><input type=\"radio\" name=\"workflow_id\" value=\"")
            .push_text(&workflow.id)
            .push_raw("\" id=\"wf-")
            .push_text(&workflow.id)
            .push_raw("\"");
        if checked {
            markup.push_raw(" checked");
        }
        markup
            .push_raw("><label for=\"wf-")
            .push_text(&workflow.id)
            .push_raw("\">")
            .push_text(&workflow.name)
            .push_raw("</label></div>\n");
    }
    markup
        .push_raw("<div style=\"margin-top: 30px;\"><label for=\"deployment-reason\" style=\"display: block; margin-bottom: 10px; font-weight: bold;\">Deployment Reason (Required):</label>")
        .push_raw("<textarea id=\"deployment-reason\" name=\"reason\" placeholder=\"Enter the reason for this deployment\" style=\"width: 100%; min-height: 80px; padding: 10px;\">")
        .push_text(controller.reason_draft())
        .push_raw("</textarea></div>\n<div style=\"margin-top: 20px;\">")
        .push(button("Continue", busy))
        .push_raw("</div>\n</form>\n");
    markup
}

fn json_panel(
    title: &'static str,
    heading_style: &'static str,
    pre_style: &'static str,
    value: &Value,
) -> Markup {
    let mut markup = Markup::raw("<div style=\"width: 45%;\"><h3 style=\"");
    markup
        .push_raw(heading_style)
        .push_raw("\">")
        .push_raw(title)
        .push_raw("</h3><pre style=\"")
        .push_raw(pre_style)
        .push_raw("\">")
        .push_text(&pretty(value))
        .push_raw("</pre></div>");
    markup
}

fn destination_banner(destination: &DestinationStatus, projected: Option<&str>) -> Markup {
    if !destination.exists {
        let mut markup = Markup::raw("<div id=\"destination-status\" style=\"background: #fff3cd; padding: 15px; border-radius: 5px; border: 1px solid #ffc107; margin-top: 20px;\"><strong>WARNING: Destination Status:</strong> ");
        markup
            .push_text(destination.message.as_deref().unwrap_or_default())
            .push_raw(" <em>A new workflow will be created.</em></div>\n");
        return markup;
    }

    let mut markup = Markup::raw("<div id=\"destination-status\" style=\"background: #ffebee; padding: 15px; border-radius: 5px; border: 2px solid #f44336; margin-top: 20px;\"><strong>WARNING: Workflow exists on destination!</strong> <strong>Workflow Name:</strong> ");
    markup
        .push_text(destination.workflow_name.as_deref().unwrap_or_default())
        .push_raw(" <strong>Workflow ID:</strong> ")
        .push_text(destination.workflow_id.as_deref().unwrap_or_default())
        .push_raw(" <em>Clicking the button will OVERWRITE the existing workflow using PUT.</em>");

    match projected {
        Some(projected) => {
            let current = destination
                .current_revision_content
                .as_deref()
                .filter(|content| !content.is_empty())
                .unwrap_or("(no content)");
            markup
                .push_raw("<h4>Revision History:</h4><div style=\"background: #f9f9f9; padding: 10px; margin: 10px 0; border-left: 4px solid #2196f3;\"><strong>Current Content:</strong><pre id=\"current-revision\">")
                .push_text(current)
                .push_raw("</pre></div><div style=\"background: #e8f5e9; padding: 10px; margin: 10px 0; border-left: 4px solid #4caf50;\"><strong>Updated Content (after deployment):</strong><pre id=\"projected-revision\">")
                .push_text(projected)
                .push_raw("</pre></div>");
        }
        None => {
            markup.push_raw("<p><em>No sticky note named \"Revision History\" found.</em></p>");
        }
    }
    markup.push_raw("</div>\n");
    markup
}

fn confirm_dialog() -> Markup {
    let mut markup = Markup::raw("<div id=\"confirm-dialog\" role=\"alertdialog\" style=\"background: #fff; padding: 20px; border: 2px solid #f44336; border-radius: 5px; margin-top: 20px;\"><pre>");
    markup
        .push_text(OVERWRITE_PROMPT)
        .push_raw("</pre><form method=\"post\" action=\"/ui/copy\" style=\"display: flex; gap: 10px;\">")
        .push_raw("<button type=\"submit\" name=\"answer\" value=\"no\">Cancel</button>")
        .push_raw("<button type=\"submit\" name=\"answer\" value=\"yes\" style=\"background: #f44336;\">OK</button>")
        .push_raw("</form></div>\n");
    markup
}

fn detail_screen(detail: &DetailScreen, awaiting_confirmation: bool, busy: bool) -> Markup {
    let mut markup = Markup::raw("<h2>Workflow Details: ");
    markup
        .push_text(&detail.workflow_name)
        .push_raw("</h2>\n<p><strong>Workflow ID:</strong> ")
        .push_text(&detail.workflow_id)
        .push_raw("</p>\n<div style=\"background: #fff3cd; padding: 15px; border-radius: 5px; border: 1px solid #ffc107; margin: 15px 0;\"><strong>Deployment Reason:</strong> ")
        .push_text(&detail.reason)
        .push_raw("</div>\n<div style=\"display: flex; gap: 20px; margin-top: 20px;\">")
        .push(json_panel(
            "Original JSON (from API)",
            "color: #666;",
            "background: #f4f4f4; padding: 15px; border-radius: 5px; overflow: auto; height: 250px; font-size: 11px;",
            &detail.original,
        ))
        .push(json_panel(
            "Cleaned JSON (ready to deploy)",
            "color: #2e7d32;",
            "background: #e8f5e9; padding: 15px; border-radius: 5px; overflow: auto; height: 250px; font-size: 11px; border: 2px solid #4caf50;",
            &detail.cleaned,
        ))
        .push_raw("</div>\n")
        .push(destination_banner(
            &detail.destination,
            detail.projected_revision.as_deref(),
        ));

    if awaiting_confirmation {
        markup.push(confirm_dialog());
    }

    markup.push_raw("<div style=\"margin-top: 20px; display: flex; gap: 10px;\"><form method=\"post\" action=\"/ui/back\">")
        .push(button("Back", busy))
        .push_raw("</form><form method=\"post\" action=\"/ui/copy\"><button type=\"submit\" id=\"copy-btn\"");
    if busy || awaiting_confirmation {
        markup.push_raw(" disabled");
    }
    if detail.destination.exists {
        markup.push_raw(" style=\"background: #f44336; color: white;\">Confirm Overwrite</button>");
    } else {
        markup.push_raw(" style=\"background: #4caf50; color: white;\">Continue with Copying</button>");
    }
    markup.push_raw("</form></div>\n");
    markup
}

fn result_screen(result: &ResultScreen) -> Markup {
    let action = result.response.action;
    let border = match action {
        CopyAction::Created => "#4caf50",
        CopyAction::Updated => "#ff9800",
    };
    let name = json_scalar(result.response.workflow.get("name")).unwrap_or_default();
    let id = json_scalar(result.response.workflow.get("id")).unwrap_or_default();

    let mut markup = Markup::raw("<div id=\"copy-result\" style=\"background: #e8f5e9; padding: 20px; border-radius: 5px; margin-top: 20px; border: 2px solid ");
    markup
        .push_raw(border)
        .push_raw(";\"><h2 style=\"color: #2e7d32;\">SUCCESS: Workflow ")
        .push_raw(action.label())
        .push_raw(" Successfully!</h2>\n<p><strong>Workflow Name:</strong> ")
        .push_text(&name)
        .push_raw("</p>\n<p><strong>Workflow ID:</strong> ")
        .push_text(&id)
        .push_raw("</p>\n<p><strong>Action:</strong> ")
        .push_raw(action.label())
        .push_raw("</p>\n<p><strong>Deployment Reason:</strong> ")
        .push_text(&result.reason)
        .push_raw("</p>\n<h3>Full Response:</h3><pre style=\"background: white; padding: 15px; border-radius: 5px; overflow: auto; max-height: 400px; font-size: 11px;\">")
        .push_text(&pretty(&result.response.workflow))
        .push_raw("</pre></div>\n<form method=\"post\" action=\"/ui/restart\" style=\"margin-top: 20px;\">")
        .push(button("Start Over", false))
        .push_raw("</form>\n");
    markup
}
