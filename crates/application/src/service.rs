use log::{debug, info};
use meme_studio_domain::{
    default_ai_styles, default_templates, AiStyle, Collage, MemeTemplate, NewCollage,
    NewMemeTemplate, NewSavedMeme, RecordId, SavedMeme, TextArea, DEFAULT_AI_STYLE,
    DEFAULT_USER_ID,
};

use crate::{
    ApplicationError, BootstrapCatalogCommand, CatalogRepository, Clock, FileScanner,
    ImportTemplatesCommand, UpdateCollageCommand, UpdateMemeCommand, UpdateTemplateCommand,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub scanned_files: usize,
    pub supported_files: usize,
    pub newly_imported: usize,
}

pub struct CatalogService {
    catalog: Box<dyn CatalogRepository>,
    scanner: Box<dyn FileScanner>,
    clock: Box<dyn Clock>,
}

impl CatalogService {
    pub fn new(
        catalog: Box<dyn CatalogRepository>,
        scanner: Box<dyn FileScanner>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            catalog,
            scanner,
            clock,
        }
    }

    /// Creates the schema and seeds default templates and styles into empty
    /// tables. Each table is seeded independently.
    pub fn bootstrap_catalog(
        &self,
        _command: BootstrapCatalogCommand,
    ) -> Result<(), ApplicationError> {
        self.catalog.initialize()?;

        if self.catalog.count_templates()? == 0 {
            let now = self.clock.now_timestamp_string();
            let seeds = default_templates();
            for template in &seeds {
                self.catalog.insert_template(template, &now)?;
            }
            info!("seeded {} default templates", seeds.len());
        }

        if self.catalog.count_styles()? == 0 {
            let seeds = default_ai_styles();
            for style in &seeds {
                self.catalog.insert_style(style)?;
            }
            info!("seeded {} ai styles", seeds.len());
        }
        Ok(())
    }

    pub fn import_templates(
        &self,
        command: ImportTemplatesCommand,
    ) -> Result<ImportReport, ApplicationError> {
        if command.folder.trim().is_empty() {
            return Err(ApplicationError::InvalidInput(
                "folder path must not be empty".to_string(),
            ));
        }

        let scan = self.scanner.scan_images(&command.folder)?;
        let now = self.clock.now_timestamp_string();
        let mut report = ImportReport {
            scanned_files: scan.scanned_files,
            supported_files: scan.supported_files,
            newly_imported: 0,
        };

        for file in scan.files {
            let image_url = file.canonical_path.to_string_lossy().to_string();
            if self.catalog.find_template_by_image_url(&image_url)?.is_some() {
                debug!("template already imported: {image_url}");
                continue;
            }

            self.catalog.insert_template(
                &NewMemeTemplate {
                    name: file.file_stem,
                    image_url,
                    user_id: None,
                    is_public: true,
                    text_areas: TextArea::top_and_bottom(),
                },
                &now,
            )?;
            report.newly_imported += 1;
        }

        info!(
            "template import finished (scanned={}, supported={}, new={})",
            report.scanned_files, report.supported_files, report.newly_imported
        );
        Ok(report)
    }

    pub fn list_templates(&self) -> Result<Vec<MemeTemplate>, ApplicationError> {
        let templates = self.catalog.list_templates()?;
        Ok(templates
            .into_iter()
            .filter(|template| template.is_public)
            .collect())
    }

    pub fn list_templates_for_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<MemeTemplate>, ApplicationError> {
        let templates = self.catalog.list_templates()?;
        Ok(templates
            .into_iter()
            .filter(|template| template.visible_to(user_id))
            .collect())
    }

    pub fn get_template(&self, id: RecordId) -> Result<MemeTemplate, ApplicationError> {
        self.catalog
            .find_template(id)?
            .ok_or_else(|| not_found("template", id))
    }

    pub fn create_template(
        &self,
        template: NewMemeTemplate,
    ) -> Result<MemeTemplate, ApplicationError> {
        template.validate()?;
        self.catalog
            .insert_template(&template, &self.clock.now_timestamp_string())
    }

    pub fn update_template(
        &self,
        command: UpdateTemplateCommand,
    ) -> Result<MemeTemplate, ApplicationError> {
        let mut template = self.get_template(command.id)?;
        command.patch.apply(&mut template)?;
        self.catalog.replace_template(&template)?;
        Ok(template)
    }

    pub fn delete_template(&self, id: RecordId) -> Result<(), ApplicationError> {
        if !self.catalog.delete_template(id)? {
            return Err(not_found("template", id));
        }
        Ok(())
    }

    pub fn list_memes(&self, user_id: i64) -> Result<Vec<SavedMeme>, ApplicationError> {
        self.catalog.list_memes_for_user(user_id)
    }

    pub fn get_meme(&self, id: RecordId) -> Result<SavedMeme, ApplicationError> {
        self.catalog
            .find_meme(id)?
            .ok_or_else(|| not_found("meme", id))
    }

    pub fn create_meme(&self, mut meme: NewSavedMeme) -> Result<SavedMeme, ApplicationError> {
        meme.validate()?;
        meme.user_id.get_or_insert(DEFAULT_USER_ID);
        meme.ai_style
            .get_or_insert_with(|| DEFAULT_AI_STYLE.to_string());
        self.catalog
            .insert_meme(&meme, &self.clock.now_timestamp_string())
    }

    pub fn update_meme(&self, command: UpdateMemeCommand) -> Result<SavedMeme, ApplicationError> {
        let mut meme = self.get_meme(command.id)?;
        command.patch.apply(&mut meme)?;
        self.catalog.replace_meme(&meme)?;
        Ok(meme)
    }

    pub fn delete_meme(&self, id: RecordId) -> Result<(), ApplicationError> {
        if !self.catalog.delete_meme(id)? {
            return Err(not_found("meme", id));
        }
        Ok(())
    }

    pub fn list_collages(&self, user_id: i64) -> Result<Vec<Collage>, ApplicationError> {
        self.catalog.list_collages_for_user(user_id)
    }

    pub fn get_collage(&self, id: RecordId) -> Result<Collage, ApplicationError> {
        self.catalog
            .find_collage(id)?
            .ok_or_else(|| not_found("collage", id))
    }

    pub fn create_collage(&self, mut collage: NewCollage) -> Result<Collage, ApplicationError> {
        collage.validate()?;
        collage.user_id.get_or_insert(DEFAULT_USER_ID);
        collage
            .ai_style
            .get_or_insert_with(|| DEFAULT_AI_STYLE.to_string());
        self.catalog
            .insert_collage(&collage, &self.clock.now_timestamp_string())
    }

    pub fn update_collage(
        &self,
        command: UpdateCollageCommand,
    ) -> Result<Collage, ApplicationError> {
        let mut collage = self.get_collage(command.id)?;
        command.patch.apply(&mut collage)?;
        self.catalog.replace_collage(&collage)?;
        Ok(collage)
    }

    pub fn delete_collage(&self, id: RecordId) -> Result<(), ApplicationError> {
        if !self.catalog.delete_collage(id)? {
            return Err(not_found("collage", id));
        }
        Ok(())
    }

    pub fn list_styles(&self) -> Result<Vec<AiStyle>, ApplicationError> {
        self.catalog.list_styles()
    }

    pub fn get_style(&self, id: RecordId) -> Result<AiStyle, ApplicationError> {
        self.catalog
            .find_style(id)?
            .ok_or_else(|| not_found("ai style", id))
    }
}

fn not_found(kind: &str, id: RecordId) -> ApplicationError {
    ApplicationError::NotFound(format!("{kind} not found for id={}", id.get()))
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    use meme_studio_domain::{NewAiStyle, SavedMemePatch, TemplatePatch};

    use super::*;
    use crate::{FileScanSummary, ScannedFile};

    #[derive(Default)]
    struct FakeCatalog {
        initialized: Cell<bool>,
        next_id: Cell<i64>,
        templates: RefCell<BTreeMap<i64, MemeTemplate>>,
        memes: RefCell<BTreeMap<i64, SavedMeme>>,
        collages: RefCell<BTreeMap<i64, Collage>>,
        styles: RefCell<BTreeMap<i64, AiStyle>>,
    }

    impl FakeCatalog {
        fn allocate(&self) -> RecordId {
            let value = self.next_id.get() + 1;
            self.next_id.set(value);
            RecordId::new(value).expect("positive id")
        }
    }

    impl CatalogRepository for FakeCatalog {
        fn initialize(&self) -> Result<(), ApplicationError> {
            self.initialized.set(true);
            Ok(())
        }

        fn count_templates(&self) -> Result<usize, ApplicationError> {
            Ok(self.templates.borrow().len())
        }

        fn insert_template(
            &self,
            template: &NewMemeTemplate,
            created_at: &str,
        ) -> Result<MemeTemplate, ApplicationError> {
            let id = self.allocate();
            let stored = MemeTemplate {
                id,
                name: template.name.clone(),
                image_url: template.image_url.clone(),
                user_id: template.user_id,
                is_public: template.is_public,
                text_areas: template.text_areas.clone(),
                created_at: created_at.to_string(),
            };
            self.templates.borrow_mut().insert(id.get(), stored.clone());
            Ok(stored)
        }

        fn list_templates(&self) -> Result<Vec<MemeTemplate>, ApplicationError> {
            Ok(self.templates.borrow().values().cloned().collect())
        }

        fn find_template(&self, id: RecordId) -> Result<Option<MemeTemplate>, ApplicationError> {
            Ok(self.templates.borrow().get(&id.get()).cloned())
        }

        fn find_template_by_image_url(
            &self,
            image_url: &str,
        ) -> Result<Option<MemeTemplate>, ApplicationError> {
            Ok(self
                .templates
                .borrow()
                .values()
                .find(|template| template.image_url == image_url)
                .cloned())
        }

        fn replace_template(&self, template: &MemeTemplate) -> Result<(), ApplicationError> {
            self.templates
                .borrow_mut()
                .insert(template.id.get(), template.clone());
            Ok(())
        }

        fn delete_template(&self, id: RecordId) -> Result<bool, ApplicationError> {
            Ok(self.templates.borrow_mut().remove(&id.get()).is_some())
        }

        fn insert_meme(
            &self,
            meme: &NewSavedMeme,
            created_at: &str,
        ) -> Result<SavedMeme, ApplicationError> {
            let id = self.allocate();
            let stored = SavedMeme {
                id,
                name: meme.name.clone(),
                image_url: meme.image_url.clone(),
                template_id: meme.template_id,
                user_id: meme.user_id,
                text_content: meme.text_content.clone(),
                applied_filters: meme.applied_filters.clone(),
                ai_style: meme.ai_style.clone().unwrap_or_default(),
                created_at: created_at.to_string(),
            };
            self.memes.borrow_mut().insert(id.get(), stored.clone());
            Ok(stored)
        }

        fn list_memes_for_user(&self, user_id: i64) -> Result<Vec<SavedMeme>, ApplicationError> {
            Ok(self
                .memes
                .borrow()
                .values()
                .filter(|meme| meme.user_id == Some(user_id))
                .cloned()
                .collect())
        }

        fn find_meme(&self, id: RecordId) -> Result<Option<SavedMeme>, ApplicationError> {
            Ok(self.memes.borrow().get(&id.get()).cloned())
        }

        fn replace_meme(&self, meme: &SavedMeme) -> Result<(), ApplicationError> {
            self.memes.borrow_mut().insert(meme.id.get(), meme.clone());
            Ok(())
        }

        fn delete_meme(&self, id: RecordId) -> Result<bool, ApplicationError> {
            Ok(self.memes.borrow_mut().remove(&id.get()).is_some())
        }

        fn insert_collage(
            &self,
            collage: &NewCollage,
            created_at: &str,
        ) -> Result<Collage, ApplicationError> {
            let id = self.allocate();
            let stored = Collage {
                id,
                name: collage.name.clone(),
                image_url: collage.image_url.clone(),
                user_id: collage.user_id,
                layout: collage.layout.clone(),
                source_images: collage.source_images.clone(),
                text_content: collage.text_content.clone(),
                applied_filters: collage.applied_filters.clone(),
                ai_style: collage.ai_style.clone().unwrap_or_default(),
                created_at: created_at.to_string(),
            };
            self.collages.borrow_mut().insert(id.get(), stored.clone());
            Ok(stored)
        }

        fn list_collages_for_user(&self, user_id: i64) -> Result<Vec<Collage>, ApplicationError> {
            Ok(self
                .collages
                .borrow()
                .values()
                .filter(|collage| collage.user_id == Some(user_id))
                .cloned()
                .collect())
        }

        fn find_collage(&self, id: RecordId) -> Result<Option<Collage>, ApplicationError> {
            Ok(self.collages.borrow().get(&id.get()).cloned())
        }

        fn replace_collage(&self, collage: &Collage) -> Result<(), ApplicationError> {
            self.collages
                .borrow_mut()
                .insert(collage.id.get(), collage.clone());
            Ok(())
        }

        fn delete_collage(&self, id: RecordId) -> Result<bool, ApplicationError> {
            Ok(self.collages.borrow_mut().remove(&id.get()).is_some())
        }

        fn count_styles(&self) -> Result<usize, ApplicationError> {
            Ok(self.styles.borrow().len())
        }

        fn insert_style(&self, style: &NewAiStyle) -> Result<AiStyle, ApplicationError> {
            let id = self.allocate();
            let stored = AiStyle {
                id,
                name: style.name.clone(),
                description: style.description.clone(),
                preview_url: style.preview_url.clone(),
                api_params: style.api_params.clone(),
                source: style.source.clone().unwrap_or_default(),
            };
            self.styles.borrow_mut().insert(id.get(), stored.clone());
            Ok(stored)
        }

        fn list_styles(&self) -> Result<Vec<AiStyle>, ApplicationError> {
            Ok(self.styles.borrow().values().cloned().collect())
        }

        fn find_style(&self, id: RecordId) -> Result<Option<AiStyle>, ApplicationError> {
            Ok(self.styles.borrow().get(&id.get()).cloned())
        }
    }

    struct FakeScanner {
        stems: Vec<&'static str>,
    }

    impl FileScanner for FakeScanner {
        fn scan_images(&self, folder: &str) -> Result<FileScanSummary, ApplicationError> {
            let files: Vec<ScannedFile> = self
                .stems
                .iter()
                .map(|stem| ScannedFile {
                    canonical_path: PathBuf::from(folder).join(format!("{stem}.png")),
                    file_stem: (*stem).to_string(),
                })
                .collect();
            Ok(FileScanSummary {
                scanned_files: files.len() + 1,
                supported_files: files.len(),
                files,
            })
        }
    }

    struct FixedClock;

    impl Clock for FixedClock {
        fn now_timestamp_string(&self) -> String {
            "1700000000".to_string()
        }
    }

    fn service(stems: Vec<&'static str>) -> CatalogService {
        CatalogService::new(
            Box::new(FakeCatalog::default()),
            Box::new(FakeScanner { stems }),
            Box::new(FixedClock),
        )
    }

    fn new_meme(name: &str) -> NewSavedMeme {
        NewSavedMeme {
            name: name.to_string(),
            image_url: "data:image/png;base64,AAAA".to_string(),
            template_id: None,
            user_id: None,
            text_content: Vec::new(),
            applied_filters: Vec::new(),
            ai_style: None,
        }
    }

    fn id(value: i64) -> RecordId {
        RecordId::new(value).expect("id")
    }

    #[test]
    fn bootstrap_seeds_defaults_once() {
        let service = service(vec![]);
        service
            .bootstrap_catalog(BootstrapCatalogCommand)
            .expect("bootstrap");
        service
            .bootstrap_catalog(BootstrapCatalogCommand)
            .expect("bootstrap again");

        let templates = service.list_templates().expect("list");
        assert_eq!(templates.len(), 5);
        assert_eq!(templates[0].name, "Template 1");
        assert_eq!(templates[0].created_at, "1700000000");
        assert_eq!(service.list_styles().expect("styles").len(), 12);
    }

    #[test]
    fn bootstrap_seeds_styles_resolvable_by_id() {
        let service = service(vec![]);
        service
            .bootstrap_catalog(BootstrapCatalogCommand)
            .expect("bootstrap");

        let styles = service.list_styles().expect("styles");
        assert_eq!(styles.len(), 12);
        let watercolor = styles
            .iter()
            .find(|style| style.name == "Watercolor")
            .expect("seeded");
        assert_eq!(
            service.get_style(watercolor.id).expect("get").name,
            "Watercolor"
        );
        assert!(matches!(
            service.get_style(id(999)),
            Err(ApplicationError::NotFound(_))
        ));
    }

    #[test]
    fn import_skips_already_known_images() {
        let service = service(vec!["drake", "distracted"]);
        let folder = "/tmp/memes".to_string();

        let first = service
            .import_templates(ImportTemplatesCommand {
                folder: folder.clone(),
            })
            .expect("first import");
        let second = service
            .import_templates(ImportTemplatesCommand { folder })
            .expect("second import");

        assert_eq!(first.newly_imported, 2);
        assert_eq!(first.scanned_files, 3);
        assert_eq!(second.newly_imported, 0);
        let templates = service.list_templates().expect("list");
        assert_eq!(templates[0].name, "drake");
        assert_eq!(templates[0].text_areas.len(), 2);
    }

    #[test]
    fn import_rejects_blank_folder() {
        let result = service(vec![]).import_templates(ImportTemplatesCommand {
            folder: "  ".to_string(),
        });
        assert!(matches!(result, Err(ApplicationError::InvalidInput(_))));
    }

    #[test]
    fn private_templates_are_only_listed_for_owner() {
        let service = service(vec![]);
        service
            .create_template(NewMemeTemplate {
                name: "Mine".to_string(),
                image_url: "/images/mine.png".to_string(),
                user_id: Some(7),
                is_public: false,
                text_areas: Vec::new(),
            })
            .expect("create");

        assert!(service.list_templates().expect("public").is_empty());
        assert_eq!(service.list_templates_for_user(7).expect("owner").len(), 1);
        assert!(service.list_templates_for_user(8).expect("other").is_empty());
    }

    #[test]
    fn create_template_validates_fields() {
        let result = service(vec![]).create_template(NewMemeTemplate {
            name: String::new(),
            image_url: "/images/x.png".to_string(),
            user_id: None,
            is_public: true,
            text_areas: Vec::new(),
        });
        assert!(matches!(result, Err(ApplicationError::Domain(_))));
    }

    #[test]
    fn update_and_delete_template() {
        let service = service(vec![]);
        service
            .bootstrap_catalog(BootstrapCatalogCommand)
            .expect("bootstrap");

        let updated = service
            .update_template(UpdateTemplateCommand {
                id: id(2),
                patch: TemplatePatch {
                    name: Some("Renamed".to_string()),
                    ..TemplatePatch::default()
                },
            })
            .expect("update");
        assert_eq!(updated.name, "Renamed");
        assert_eq!(service.get_template(id(2)).expect("get").name, "Renamed");

        service.delete_template(id(2)).expect("delete");
        assert!(matches!(
            service.delete_template(id(2)),
            Err(ApplicationError::NotFound(_))
        ));
    }

    #[test]
    fn memes_default_to_the_default_user_and_no_style() {
        let service = service(vec![]);
        let meme = service.create_meme(new_meme("first")).expect("create");

        assert_eq!(meme.user_id, Some(DEFAULT_USER_ID));
        assert_eq!(meme.ai_style, DEFAULT_AI_STYLE);
        assert_eq!(service.list_memes(DEFAULT_USER_ID).expect("list").len(), 1);
        assert!(service.list_memes(99).expect("list").is_empty());
    }

    #[test]
    fn meme_update_keeps_untouched_fields() {
        let service = service(vec![]);
        let meme = service.create_meme(new_meme("first")).expect("create");

        let updated = service
            .update_meme(UpdateMemeCommand {
                id: meme.id,
                patch: SavedMemePatch {
                    ai_style: Some("Starry Night".to_string()),
                    ..SavedMemePatch::default()
                },
            })
            .expect("update");
        assert_eq!(updated.ai_style, "Starry Night");
        assert_eq!(updated.name, "first");

        assert!(matches!(
            service.get_meme(id(42)),
            Err(ApplicationError::NotFound(_))
        ));
    }

    #[test]
    fn collage_lifecycle() {
        let service = service(vec![]);
        let collage = service
            .create_collage(NewCollage {
                name: "Trip".to_string(),
                image_url: "data:image/png;base64,AAAA".to_string(),
                layout: "grid-2x2".to_string(),
                user_id: None,
                source_images: vec!["a.png".to_string(), "b.png".to_string()],
                text_content: Vec::new(),
                applied_filters: Vec::new(),
                ai_style: None,
            })
            .expect("create");
        assert_eq!(collage.source_images.len(), 2);
        assert_eq!(
            service.list_collages(DEFAULT_USER_ID).expect("list").len(),
            1
        );

        service.delete_collage(collage.id).expect("delete");
        assert!(matches!(
            service.get_collage(collage.id),
            Err(ApplicationError::NotFound(_))
        ));
    }
}
