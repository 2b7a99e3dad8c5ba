//! Database schema definitions
//!
//! Table, column and index names are read directly by the bookmarks service,
//! so they must not change without a new schema version.

/// Highest schema version this build knows how to create
pub const LATEST_VERSION: i64 = 1;

/// SQL to create the version marker table (at most one row)
pub const CREATE_DB_VERSION_TABLE: &str = r#"
CREATE TABLE DbVersion (
    version INTEGER PRIMARY KEY
)
"#;

/// SQL to create the users table
pub const CREATE_USERS_TABLE: &str = r#"
CREATE TABLE Users (
    uuid TEXT PRIMARY KEY,
    username TEXT UNIQUE NOT NULL,
    email TEXT UNIQUE NOT NULL,
    password_hash TEXT NOT NULL,
    salt TEXT NOT NULL,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    last_login TIMESTAMP,
    email_verified BOOLEAN DEFAULT FALSE
)
"#;

/// SQL to create the per-user settings table
pub const CREATE_USER_SETTINGS_TABLE: &str = r#"
CREATE TABLE UserSettings (
    user_uuid TEXT,
    setting_name TEXT,
    value TEXT,
    PRIMARY KEY (user_uuid, setting_name),
    FOREIGN KEY (user_uuid) REFERENCES Users(uuid)
)
"#;

/// SQL to create the favicon cache, shared by every bookmark of a domain
pub const CREATE_FAVICONS_TABLE: &str = r#"
CREATE TABLE Favicons (
    domain TEXT PRIMARY KEY,
    image BLOB,
    content_type TEXT,
    last_updated TIMESTAMP
)
"#;

/// SQL to create the bookmarks table
/// Folders have no url; `parent_uuid` forms one tree per user
pub const CREATE_BOOKMARKS_TABLE: &str = r#"
CREATE TABLE Bookmarks (
    uuid TEXT PRIMARY KEY,
    user_uuid TEXT NOT NULL,
    url TEXT,
    name TEXT NOT NULL,
    is_folder BOOLEAN,
    parent_uuid TEXT,
    favicon_domain TEXT,
    created_at TIMESTAMP,
    last_visited TIMESTAMP,
    description TEXT,
    order_index INTEGER,
    favorite BOOLEAN DEFAULT FALSE,
    FOREIGN KEY (parent_uuid) REFERENCES Bookmarks(uuid),
    FOREIGN KEY (favicon_domain) REFERENCES Favicons(domain),
    FOREIGN KEY (user_uuid) REFERENCES Users(uuid)
)
"#;

/// SQL to create the tags table
pub const CREATE_TAGS_TABLE: &str = r#"
CREATE TABLE Tags (
    uuid TEXT PRIMARY KEY,
    user_uuid TEXT NOT NULL,
    name TEXT NOT NULL,
    color TEXT,
    FOREIGN KEY (user_uuid) REFERENCES Users(uuid)
)
"#;

/// SQL to create the bookmark/tag join table
pub const CREATE_BOOKMARK_TAGS_TABLE: &str = r#"
CREATE TABLE BookmarkTags (
    bookmark_uuid TEXT,
    tag_uuid TEXT,
    PRIMARY KEY (bookmark_uuid, tag_uuid),
    FOREIGN KEY (bookmark_uuid) REFERENCES Bookmarks(uuid),
    FOREIGN KEY (tag_uuid) REFERENCES Tags(uuid)
)
"#;

/// v1 tables as `(name, ddl)`, referenced tables first
pub const V1_TABLES: &[(&str, &str)] = &[
    ("DbVersion", CREATE_DB_VERSION_TABLE),
    ("Users", CREATE_USERS_TABLE),
    ("UserSettings", CREATE_USER_SETTINGS_TABLE),
    ("Favicons", CREATE_FAVICONS_TABLE),
    ("Bookmarks", CREATE_BOOKMARKS_TABLE),
    ("Tags", CREATE_TAGS_TABLE),
    ("BookmarkTags", CREATE_BOOKMARK_TAGS_TABLE),
];

/// v1 indexes as `(name, ddl)`, created after all tables
pub const V1_INDEXES: &[(&str, &str)] = &[
    ("idx_users_email", "CREATE INDEX idx_users_email ON Users(email)"),
    ("idx_users_username", "CREATE INDEX idx_users_username ON Users(username)"),
    ("idx_bookmarks_user", "CREATE INDEX idx_bookmarks_user ON Bookmarks(user_uuid)"),
    ("idx_bookmarks_parent", "CREATE INDEX idx_bookmarks_parent ON Bookmarks(parent_uuid)"),
    ("idx_bookmarks_favicon", "CREATE INDEX idx_bookmarks_favicon ON Bookmarks(favicon_domain)"),
    ("idx_bookmarks_folder", "CREATE INDEX idx_bookmarks_folder ON Bookmarks(user_uuid, is_folder)"),
    ("idx_bookmarks_folder_order", "CREATE INDEX idx_bookmarks_folder_order ON Bookmarks(parent_uuid, order_index)"),
    ("idx_bookmarks_favorite", "CREATE INDEX idx_bookmarks_favorite ON Bookmarks(user_uuid, favorite)"),
    ("idx_tags_user", "CREATE INDEX idx_tags_user ON Tags(user_uuid)"),
    ("idx_tags_name", "CREATE INDEX idx_tags_name ON Tags(user_uuid, name)"),
    ("idx_bookmarktags_tag", "CREATE INDEX idx_bookmarktags_tag ON BookmarkTags(tag_uuid)"),
    ("idx_bookmarktags_bookmark", "CREATE INDEX idx_bookmarktags_bookmark ON BookmarkTags(bookmark_uuid)"),
    ("idx_usersettings_user", "CREATE INDEX idx_usersettings_user ON UserSettings(user_uuid)"),
];

/// Per-connection settings applied before any schema work
pub const CONNECTION_PRAGMAS: &str = "
PRAGMA foreign_keys = ON;
PRAGMA busy_timeout = 5000;
";

/// Names of every v1 table followed by every v1 index
pub fn v1_object_names() -> Vec<&'static str> {
    V1_TABLES
        .iter()
        .chain(V1_INDEXES.iter())
        .map(|(name, _)| *name)
        .collect()
}
