use crate::read::{StreamRead, StreamReadPage, StreamReadSlice};
use owo_colors::OwoColorize;

pub fn render_read(read: &StreamRead) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "{} {} slices | {} pages | {} records",
        "Stream read:".bold(),
        read.slices.len(),
        read.page_count(),
        read.record_count()
    ));
    if read.test_read_limit_reached {
        out.push_str(&format!(" {}", "(limit reached)".yellow()));
    }
    out.push_str("\n\n");

    for (i, slice) in read.slices.iter().enumerate() {
        render_slice(&mut out, i + 1, slice);
    }

    if !read.logs.is_empty() {
        out.push_str(&format!("{} ({})\n", "Logs".bold(), read.logs.len()));
        for line in &read.logs {
            out.push_str(&format!("  {}\n", line.message.dimmed()));
        }
        out.push('\n');
    }

    match read.inferred_schema.as_ref().and_then(|s| s.get("properties")) {
        Some(properties) => out.push_str(&format!(
            "Schema: {} top-level properties\n",
            properties.as_object().map_or(0, |p| p.len())
        )),
        None => out.push_str("Schema: <none>\n"),
    }

    out
}

fn render_slice(out: &mut String, index: usize, slice: &StreamReadSlice) {
    out.push_str(&format!("{}", format!("Slice {index}").bold()));
    if let Some(descriptor) = &slice.slice_descriptor {
        let parts: Vec<String> = [
            descriptor.start_datetime.as_ref().map(|s| format!("start {s}")),
            descriptor.list_item.as_ref().map(|s| format!("item {s}")),
        ]
        .into_iter()
        .flatten()
        .collect();
        out.push_str(&format!(" [{}]", parts.join(" | ")));
    }
    out.push('\n');

    if slice.pages.is_empty() {
        out.push_str("  <no pages>\n");
    }
    for (i, page) in slice.pages.iter().enumerate() {
        render_page(out, i + 1, page);
    }
    out.push('\n');
}

fn render_page(out: &mut String, index: usize, page: &StreamReadPage) {
    out.push_str(&format!("  Page {index}  "));

    match &page.request {
        Some(request) => out.push_str(&format!("{} {}", request.http_method, request.url)),
        None => out.push_str(&format!("{}", "<unparsed request>".red())),
    }

    match &page.response {
        Some(response) if response.status >= 400 => {
            out.push_str(&format!(" → {}", response.status.red()))
        }
        Some(response) => out.push_str(&format!(" → {}", response.status.green())),
        None => out.push_str(&format!(" → {}", "<unparsed response>".red())),
    }

    out.push_str(&format!("  ({} records)\n", page.records.len()));

    if let Some(parameters) = page.request.as_ref().and_then(|r| r.parameters.as_ref()) {
        for (key, values) in parameters {
            out.push_str(&format!("      {key}={}\n", values.join(",")));
        }
    }
}
