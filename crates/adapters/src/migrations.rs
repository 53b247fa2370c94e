/// Applied in order on every `initialize`; each statement must be idempotent.
pub const MIGRATIONS: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS meme_templates (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        image_url TEXT NOT NULL,
        user_id INTEGER,
        is_public INTEGER NOT NULL DEFAULT 0,
        text_areas_json TEXT NOT NULL DEFAULT '[]',
        created_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_meme_templates_image_url ON meme_templates(image_url);",
    "CREATE TABLE IF NOT EXISTS saved_memes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        image_url TEXT NOT NULL,
        template_id INTEGER REFERENCES meme_templates(id) ON DELETE SET NULL,
        user_id INTEGER,
        text_content_json TEXT NOT NULL DEFAULT '[]',
        applied_filters_json TEXT NOT NULL DEFAULT '[]',
        ai_style TEXT NOT NULL DEFAULT 'none',
        created_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_saved_memes_user ON saved_memes(user_id);",
    "CREATE TABLE IF NOT EXISTS collages (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        image_url TEXT NOT NULL,
        user_id INTEGER,
        layout TEXT NOT NULL,
        source_images_json TEXT NOT NULL DEFAULT '[]',
        text_content_json TEXT NOT NULL DEFAULT '[]',
        applied_filters_json TEXT NOT NULL DEFAULT '[]',
        ai_style TEXT NOT NULL DEFAULT 'none',
        created_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_collages_user ON collages(user_id);",
    "CREATE TABLE IF NOT EXISTS local_storage (
        origin TEXT NOT NULL,
        key TEXT NOT NULL,
        value TEXT NOT NULL,
        PRIMARY KEY (origin, key)
    );",
    "CREATE TABLE IF NOT EXISTS ai_styles (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        description TEXT,
        preview_url TEXT,
        api_params_json TEXT NOT NULL DEFAULT '{}',
        source TEXT NOT NULL DEFAULT 'magenta'
    );",
];
