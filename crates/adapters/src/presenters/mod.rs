use meme_studio_application::ImportReport;
use meme_studio_domain::{AiStyle, Collage, MemeTemplate, SavedMeme, StyleState};

pub fn present_template_row(template: &MemeTemplate) -> String {
    format!(
        "{}\t{}\t{}\t{} areas\t{}",
        template.id.get(),
        visibility(template.is_public),
        template.name,
        template.text_areas.len(),
        template.image_url
    )
}

pub fn present_meme_row(meme: &SavedMeme) -> String {
    format!(
        "{}\t{}\tstyle={}\ttemplate={}\t{}",
        meme.id.get(),
        meme.name,
        meme.ai_style,
        meme.template_id
            .map(|id| id.get().to_string())
            .unwrap_or_else(|| "-".to_string()),
        meme.created_at
    )
}

pub fn present_collage_row(collage: &Collage) -> String {
    format!(
        "{}\t{}\tlayout={}\t{} images\t{}",
        collage.id.get(),
        collage.name,
        collage.layout,
        collage.source_images.len(),
        collage.created_at
    )
}

pub fn present_style_row(style: &AiStyle) -> String {
    format!(
        "{}\t{}\tmodel={}\tsource={}\t{}",
        style.id.get(),
        style.name,
        style.api_params.ai_model,
        style.source,
        style.description.as_deref().unwrap_or("-")
    )
}

pub fn present_import_report(report: &ImportReport) -> String {
    format!(
        "scanned={} supported={} imported={}",
        report.scanned_files, report.supported_files, report.newly_imported
    )
}

/// Images are usually multi-megabyte data URIs, so only a prefix is shown.
pub fn present_style_state(state: &StyleState) -> String {
    let image = state
        .current_image
        .as_deref()
        .map(abbreviate)
        .unwrap_or_else(|| "(none)".to_string());
    let style = state.last_style_used.as_deref().unwrap_or("(none)");
    format!("current_image={image}\nlast_style_used={style}")
}

fn visibility(is_public: bool) -> &'static str {
    if is_public {
        "public"
    } else {
        "private"
    }
}

fn abbreviate(value: &str) -> String {
    const LIMIT: usize = 48;
    match value.char_indices().nth(LIMIT) {
        Some((end, _)) => format!("{}... ({} bytes)", &value[..end], value.len()),
        None => value.to_string(),
    }
}
