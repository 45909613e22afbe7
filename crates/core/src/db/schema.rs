pub const SCHEMA: &str = "
-- Prompt versions: one row per version, chained by original_id
CREATE TABLE IF NOT EXISTS prompts (
    id TEXT PRIMARY KEY,            -- UUID v4 string, unique per version
    original_id TEXT NOT NULL,      -- id of version 1 of this chain
    version INTEGER NOT NULL,       -- 1-based, strictly increasing per chain
    title TEXT NOT NULL,            -- Display title
    description TEXT NOT NULL,      -- Short description
    text TEXT NOT NULL,             -- The prompt body, may contain {{vars}}
    tags TEXT NOT NULL,             -- JSON array of strings: [\"code\", \"debug\"]
    folder_id TEXT,                 -- Owning folder, NULL until migrated
    created_at TEXT NOT NULL,       -- RFC 3339 UTC timestamp
    last_used_at TEXT,              -- RFC 3339 UTC timestamp
    times_used INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_prompts_original_id ON prompts(original_id);
CREATE INDEX IF NOT EXISTS idx_prompts_folder_id ON prompts(folder_id);
CREATE INDEX IF NOT EXISTS idx_prompts_version ON prompts(version);
CREATE INDEX IF NOT EXISTS idx_prompts_created ON prompts(created_at);
CREATE INDEX IF NOT EXISTS idx_prompts_last_used ON prompts(last_used_at);
CREATE INDEX IF NOT EXISTS idx_prompts_title ON prompts(title);

-- Folder tree, parent_id NULL for root-level folders
CREATE TABLE IF NOT EXISTS folders (
    id TEXT PRIMARY KEY,            -- UUID v4 string
    name TEXT NOT NULL,             -- Display name, unique among siblings
    parent_id TEXT,                 -- NULL = root level
    is_deletable INTEGER NOT NULL DEFAULT 1,
    is_renamable INTEGER NOT NULL DEFAULT 1
);

CREATE INDEX IF NOT EXISTS idx_folders_parent ON folders(parent_id);
CREATE INDEX IF NOT EXISTS idx_folders_name ON folders(name);
";
