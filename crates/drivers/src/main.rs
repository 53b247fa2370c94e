mod cli;
mod config;
mod logging;

use std::fs;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use cli::{
    ApiAction, Cli, CollageAction, Command, DisplayArgs, MemeAction, StateAction, StyleAction,
    TemplateAction,
};
use config::AppConfig;
use log::info;
use meme_studio_adapters::{
    present_collage_row, present_import_report, present_meme_row, present_style_row,
    present_style_state, present_template_row, ImageCrateDecoder, ReqwestTransport, SqliteCatalogRepository,
    SqliteStyleStore, SystemClock, TextureSynthesisModel, WalkdirFileScanner,
};
use meme_studio_application::{
    ApiClient, ApplicationError, BootstrapCatalogCommand, CatalogService, ImageDisplay,
    ImportTemplatesCommand, StyleContext, StyleProvider, StylizeCommand, StylizeReport,
    StylizeService, UpdateTemplateCommand,
};
use meme_studio_domain::{
    ApplyStyleRequest, DataUri, DisplaySelection, NewCollage, NewMemeTemplate, NewSavedMeme,
    RecordId, Route, StyleStrength, TemplatePatch, TextArea, DEFAULT_USER_ID, NAV_ITEMS,
};
use serde::Serialize;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(error) => {
            logging::init_logging(cli.log_level.as_deref().unwrap_or("info"));
            eprintln!("{error}");
            return ExitCode::from(2);
        }
    };
    logging::init_logging(cli.log_level.as_deref().unwrap_or(&config.log_level));

    match run_command(cli.command, &config) {
        Ok(code) => code,
        Err(CommandError::Usage(msg)) => {
            eprintln!("{msg}");
            ExitCode::from(2)
        }
        Err(CommandError::Runtime(msg)) => {
            eprintln!("{msg}");
            ExitCode::from(1)
        }
    }
}

#[derive(Debug, Clone)]
enum CommandError {
    Usage(String),
    Runtime(String),
}

fn runtime(action: &'static str) -> impl Fn(ApplicationError) -> CommandError {
    move |error| CommandError::Runtime(format!("{action} failed: {error}"))
}

fn record_id(value: i64) -> Result<RecordId, CommandError> {
    RecordId::new(value).map_err(|error| CommandError::Usage(format!("invalid id: {error}")))
}

fn build_catalog_service(config: &AppConfig) -> Result<CatalogService, CommandError> {
    let service = CatalogService::new(
        Box::new(SqliteCatalogRepository::new(config.catalog_path.clone())),
        Box::new(WalkdirFileScanner),
        Box::new(SystemClock),
    );
    service
        .bootstrap_catalog(BootstrapCatalogCommand)
        .map_err(runtime("catalog bootstrap"))?;
    Ok(service)
}

fn build_style_provider(config: &AppConfig) -> StyleProvider {
    let store = SqliteStyleStore::new(&config.state_path, config.origin.clone());
    StyleProvider::new(StyleContext::hydrated(Box::new(store)))
}

fn build_api_client(config: &AppConfig) -> Result<ApiClient, CommandError> {
    let transport = ReqwestTransport::new(config.http_timeout()).map_err(runtime("http setup"))?;
    Ok(ApiClient::new(Box::new(transport), config.api_base_url.clone()))
}

fn run_command(command: Command, config: &AppConfig) -> Result<ExitCode, CommandError> {
    match command {
        Command::Stylize {
            content,
            style,
            output,
            strength,
            timeout,
        } => {
            let strength = match strength {
                Some(value) => StyleStrength::new(value)
                    .map_err(|error| CommandError::Usage(error.to_string()))?,
                None => config
                    .strength()
                    .map_err(|error| CommandError::Usage(error.to_string()))?,
            };
            let timeout = timeout
                .map(Duration::from_secs)
                .unwrap_or_else(|| config.stylize_timeout());
            let service =
                StylizeService::new(Box::new(TextureSynthesisModel::new(config.style_threads, 0)));
            let report = service.stylize_with_timeout(
                StylizeCommand {
                    content_path: content,
                    style_path: style,
                    output_path: output.clone(),
                    strength,
                },
                timeout,
            );
            println!("{}", describe_stylize(&report, &output));
            Ok(ExitCode::from(report.exit_code()))
        }
        Command::State { action } => {
            run_state(action, config)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Display(args) => {
            run_display(args, config)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Route { path } => {
            for line in render_route(&path) {
                println!("{line}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Templates { action } => {
            run_templates(action, &build_catalog_service(config)?)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Memes { action } => {
            run_memes(action, &build_catalog_service(config)?)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Collages { action } => {
            run_collages(action, &build_catalog_service(config)?)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Styles { action } => {
            run_styles(action, &build_catalog_service(config)?)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Api { action } => {
            run_api(action, config)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn run_state(action: StateAction, config: &AppConfig) -> Result<(), CommandError> {
    let provider = build_style_provider(config);
    let editor = provider.consumer();

    match action {
        StateAction::Show => {}
        StateAction::SetImage { source, embed } => {
            let image = resolve_source(&source, embed)?;
            editor.with_mut(|context| context.set_current_image(Some(image)));
        }
        StateAction::ApplyStyle {
            source,
            style,
            embed,
        } => {
            let image = resolve_source(&source, embed)?;
            editor.with_mut(|context| {
                context.apply_style(image);
                context.set_last_style_used(style);
            });
        }
        StateAction::SetStyle { name } => {
            let name = (!name.is_empty()).then_some(name);
            editor.with_mut(|context| context.set_last_style_used(name));
        }
        StateAction::Clear => editor.with_mut(StyleContext::clear),
    }

    println!("{}", present_style_state(provider.context().state()));
    Ok(())
}

fn run_display(args: DisplayArgs, config: &AppConfig) -> Result<(), CommandError> {
    let provider = build_style_provider(config);
    let mut display = ImageDisplay::new(Arc::new(ImageCrateDecoder))
        .with_candidates(args.candidates)
        .on_image_ready(|surface| {
            info!("display ready ({}x{})", surface.width(), surface.height());
        });

    let scheduled = display.refresh(&provider.context());
    if scheduled && !display.wait_ready(Duration::from_millis(args.wait_ms)) {
        return Err(CommandError::Runtime(
            "selected image could not be drawn".to_string(),
        ));
    }

    match display.selection() {
        DisplaySelection::Context(_) => println!("showing: current image"),
        DisplaySelection::Candidate(source) => println!("showing: {source}"),
        DisplaySelection::Empty => println!("nothing to display"),
    }
    if let Some(caption) = display.caption() {
        println!("{caption}");
    }

    if let Some(out) = args.out {
        let surface = display.surface();
        if display.drawn_source().is_none() {
            return Err(CommandError::Runtime("no image was drawn".to_string()));
        }
        let image =
            image::RgbaImage::from_raw(surface.width(), surface.height(), surface.pixels().to_vec())
                .ok_or_else(|| CommandError::Runtime("surface size mismatch".to_string()))?;
        image
            .save(&out)
            .map_err(|error| CommandError::Runtime(format!("failed to write {}: {error}", out.display())))?;
        println!("wrote {}", out.display());
    }
    Ok(())
}

fn run_templates(action: TemplateAction, service: &CatalogService) -> Result<(), CommandError> {
    match action {
        TemplateAction::List { user } => {
            let templates = match user {
                Some(user_id) => service.list_templates_for_user(user_id),
                None => service.list_templates(),
            }
            .map_err(runtime("list templates"))?;
            print_rows(&templates, present_template_row, "no templates in catalog");
        }
        TemplateAction::Show { id } => {
            let template = service
                .get_template(record_id(id)?)
                .map_err(runtime("show template"))?;
            print_json(&template)?;
        }
        TemplateAction::Create {
            name,
            image_url,
            user,
            private,
        } => {
            let template = service
                .create_template(NewMemeTemplate {
                    name,
                    image_url,
                    user_id: user,
                    is_public: !private,
                    text_areas: TextArea::top_and_bottom(),
                })
                .map_err(runtime("create template"))?;
            println!("{}", present_template_row(&template));
        }
        TemplateAction::Import { folder } => {
            let report = service
                .import_templates(ImportTemplatesCommand { folder })
                .map_err(runtime("import"))?;
            println!("import finished: {}", present_import_report(&report));
        }
        TemplateAction::Update { id, name, public } => {
            let template = service
                .update_template(UpdateTemplateCommand {
                    id: record_id(id)?,
                    patch: TemplatePatch {
                        name,
                        is_public: public,
                        ..TemplatePatch::default()
                    },
                })
                .map_err(runtime("update template"))?;
            println!("{}", present_template_row(&template));
        }
        TemplateAction::Delete { id } => {
            service
                .delete_template(record_id(id)?)
                .map_err(runtime("delete template"))?;
            println!("deleted template {id}");
        }
    }
    Ok(())
}

fn run_memes(action: MemeAction, service: &CatalogService) -> Result<(), CommandError> {
    match action {
        MemeAction::List { user } => {
            let memes = service
                .list_memes(user.unwrap_or(DEFAULT_USER_ID))
                .map_err(runtime("list memes"))?;
            print_rows(&memes, present_meme_row, "no saved memes");
        }
        MemeAction::Show { id } => {
            let meme = service
                .get_meme(record_id(id)?)
                .map_err(runtime("show meme"))?;
            print_json(&meme)?;
        }
        MemeAction::Create {
            name,
            image_url,
            template,
            style,
        } => {
            let template_id = template.map(record_id).transpose()?;
            let meme = service
                .create_meme(NewSavedMeme {
                    name,
                    image_url,
                    template_id,
                    user_id: None,
                    text_content: Vec::new(),
                    applied_filters: Vec::new(),
                    ai_style: style,
                })
                .map_err(runtime("create meme"))?;
            println!("{}", present_meme_row(&meme));
        }
        MemeAction::Delete { id } => {
            service
                .delete_meme(record_id(id)?)
                .map_err(runtime("delete meme"))?;
            println!("deleted meme {id}");
        }
    }
    Ok(())
}

fn run_collages(action: CollageAction, service: &CatalogService) -> Result<(), CommandError> {
    match action {
        CollageAction::List { user } => {
            let collages = service
                .list_collages(user.unwrap_or(DEFAULT_USER_ID))
                .map_err(runtime("list collages"))?;
            print_rows(&collages, present_collage_row, "no collages");
        }
        CollageAction::Show { id } => {
            let collage = service
                .get_collage(record_id(id)?)
                .map_err(runtime("show collage"))?;
            print_json(&collage)?;
        }
        CollageAction::Create {
            name,
            image_url,
            layout,
            sources,
        } => {
            let collage = service
                .create_collage(NewCollage {
                    name,
                    image_url,
                    layout,
                    user_id: None,
                    source_images: sources,
                    text_content: Vec::new(),
                    applied_filters: Vec::new(),
                    ai_style: None,
                })
                .map_err(runtime("create collage"))?;
            println!("{}", present_collage_row(&collage));
        }
        CollageAction::Delete { id } => {
            service
                .delete_collage(record_id(id)?)
                .map_err(runtime("delete collage"))?;
            println!("deleted collage {id}");
        }
    }
    Ok(())
}

fn run_styles(action: StyleAction, service: &CatalogService) -> Result<(), CommandError> {
    match action {
        StyleAction::List => {
            let styles = service.list_styles().map_err(runtime("list styles"))?;
            print_rows(&styles, present_style_row, "no styles");
        }
        StyleAction::Show { id } => {
            let style = service
                .get_style(record_id(id)?)
                .map_err(runtime("show style"))?;
            print_json(&style)?;
        }
    }
    Ok(())
}

fn run_api(action: ApiAction, config: &AppConfig) -> Result<(), CommandError> {
    let client = build_api_client(config)?;
    match action {
        ApiAction::Get {
            path,
            on_unauthorized,
        } => {
            let value = client
                .query_fn::<serde_json::Value>(on_unauthorized.into())
                .fetch(&path)
                .map_err(runtime("request"))?;
            match value {
                Some(value) => print_json(&value)?,
                None => println!("null"),
            }
        }
        ApiAction::ApplyStyle {
            image,
            style_id,
            name,
        } => {
            let style_id = record_id(style_id)?;
            let image_data = embed_file(&image)?;
            let name = match name {
                Some(name) => name,
                None => {
                    client
                        .get_style(style_id)
                        .map_err(runtime("style lookup"))?
                        .name
                }
            };
            let response = client
                .apply_style(&ApplyStyleRequest::new(image_data, style_id))
                .map_err(runtime("apply style"))?;

            let provider = build_style_provider(config);
            let editor = provider.consumer();
            editor.with_mut(|context| {
                context.apply_style(response.styled_image);
                context.set_last_style_used(Some(name));
            });
            println!("{}", present_style_state(provider.context().state()));
        }
    }
    Ok(())
}

fn describe_stylize(report: &StylizeReport, output: &Path) -> String {
    match report {
        StylizeReport::Completed => format!("stylized image written to {}", output.display()),
        StylizeReport::Failed => "style transfer failed".to_string(),
        StylizeReport::MissingInput(path) => format!("input not found: {}", path.display()),
        StylizeReport::TimedOut {
            fallback_copied: true,
        } => format!("timed out, copied source image to {}", output.display()),
        StylizeReport::TimedOut {
            fallback_copied: false,
        } => "timed out and the source image could not be copied".to_string(),
    }
}

fn render_route(path: &str) -> Vec<String> {
    let route = Route::resolve(path);
    let mut lines = vec![format!("{} ({})", route.title(), route.path())];
    for item in NAV_ITEMS {
        let marker = if item.is_active(path) { "*" } else { " " };
        lines.push(format!("{marker} {}\t{}", item.title, item.href));
    }
    lines
}

fn resolve_source(source: &str, embed: bool) -> Result<String, CommandError> {
    if embed {
        embed_file(Path::new(source))
    } else {
        Ok(source.to_string())
    }
}

fn embed_file(path: &Path) -> Result<String, CommandError> {
    let bytes = fs::read(path).map_err(|error| {
        CommandError::Runtime(format!("failed to read {}: {error}", path.display()))
    })?;
    let mime = image::ImageFormat::from_path(path)
        .map(|format| format.to_mime_type())
        .map_err(|_| {
            CommandError::Usage(format!("unrecognized image type: {}", path.display()))
        })?;
    Ok(DataUri::new(mime, bytes).encode())
}

fn print_rows<T>(rows: &[T], present: fn(&T) -> String, empty: &str) {
    if rows.is_empty() {
        println!("{empty}");
        return;
    }
    for row in rows {
        println!("{}", present(row));
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CommandError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|error| CommandError::Runtime(error.to_string()))?;
    println!("{json}");
    Ok(())
}
