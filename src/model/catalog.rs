//! Built-in catalog: known datasets and book display names.

/// A dataset that can be requested from the remote host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownSource {
    /// Dataset id, also the remote file stem and cache key.
    pub id: &'static str,
    /// Human-readable language and version.
    pub label: &'static str,
}

/// Dataset opened when nothing else was chosen.
pub const DEFAULT_SOURCE: &str = "en_kjv";

/// Datasets published by the default host, default first.
pub const KNOWN_SOURCES: &[KnownSource] = &[
    KnownSource { id: "en_kjv", label: "English: King James Version" },
    KnownSource { id: "en_bbe", label: "English: Basic English" },
    KnownSource { id: "es_rvr", label: "Español: Reina Valera" },
    KnownSource { id: "pt_nvi", label: "Português: Nova Versão Internacional" },
    KnownSource { id: "pt_aa", label: "Português: Almeida Revisada Imprensa Bíblica" },
    KnownSource { id: "pt_acf", label: "Português: Almeida Corrigida e Revisada Fiel" },
    KnownSource { id: "de_schlachter", label: "Deutsch: Schlachter" },
    KnownSource { id: "fr_apee", label: "Français: L'Épée" },
    KnownSource { id: "ru_synodal", label: "Русский: Синодальный перевод" },
    KnownSource { id: "ro_cornilescu", label: "Română: Versiunea Cornilescu" },
    KnownSource { id: "fi_finnish", label: "Suomi: Finnish Bible" },
    KnownSource { id: "eo_esperanto", label: "Esperanto" },
    KnownSource { id: "el_greek", label: "Ελληνικά: Modern Greek" },
    KnownSource { id: "vi_vietnamese", label: "Tiếng Việt" },
    KnownSource { id: "ko_ko", label: "한국어: Korean Version" },
    KnownSource { id: "zh_cuv", label: "中文: Chinese Union Version" },
    KnownSource { id: "zh_ncv", label: "中文: New Chinese Version" },
    KnownSource { id: "ar_svd", label: "العربية: Smith & van Dyke" },
];

/// Abbreviation used by the datasets, paired with the English book name.
///
/// The numbered books also appear under their common alternate spellings.
const BOOK_NAMES: &[(&str, &str)] = &[
    ("gn", "Genesis"),
    ("ex", "Exodus"),
    ("lv", "Leviticus"),
    ("nm", "Numbers"),
    ("dt", "Deuteronomy"),
    ("js", "Joshua"),
    ("jud", "Judges"),
    ("rt", "Ruth"),
    ("1sm", "1 Samuel"),
    ("2sm", "2 Samuel"),
    ("1kgs", "1 Kings"),
    ("2kgs", "2 Kings"),
    ("1ch", "1 Chronicles"),
    ("2ch", "2 Chronicles"),
    ("ezr", "Ezra"),
    ("ne", "Nehemiah"),
    ("et", "Esther"),
    ("job", "Job"),
    ("ps", "Psalms"),
    ("prv", "Proverbs"),
    ("ec", "Ecclesiastes"),
    ("so", "Song of Solomon"),
    ("is", "Isaiah"),
    ("jr", "Jeremiah"),
    ("lm", "Lamentations"),
    ("ez", "Ezekiel"),
    ("dn", "Daniel"),
    ("ho", "Hosea"),
    ("jl", "Joel"),
    ("am", "Amos"),
    ("ob", "Obadiah"),
    ("jn", "Jonah"),
    ("mi", "Micah"),
    ("na", "Nahum"),
    ("hk", "Habakkuk"),
    ("zp", "Zephaniah"),
    ("hg", "Haggai"),
    ("zc", "Zechariah"),
    ("ml", "Malachi"),
    ("mt", "Matthew"),
    ("mk", "Mark"),
    ("lk", "Luke"),
    ("jo", "John"),
    ("act", "Acts"),
    ("rm", "Romans"),
    ("1co", "1 Corinthians"),
    ("2co", "2 Corinthians"),
    ("gl", "Galatians"),
    ("eph", "Ephesians"),
    ("ph", "Philippians"),
    ("cl", "Colossians"),
    ("1ts", "1 Thessalonians"),
    ("2ts", "2 Thessalonians"),
    ("1tm", "1 Timothy"),
    ("2tm", "2 Timothy"),
    ("tt", "Titus"),
    ("phm", "Philemon"),
    ("hb", "Hebrews"),
    ("jm", "James"),
    ("1pe", "1 Peter"),
    ("2pe", "2 Peter"),
    ("1jo", "1 John"),
    ("2jo", "2 John"),
    ("3jo", "3 John"),
    ("jd", "Jude"),
    ("re", "Revelation"),
    // alternate spellings
    ("1sa", "1 Samuel"),
    ("2sa", "2 Samuel"),
    ("1ki", "1 Kings"),
    ("2ki", "2 Kings"),
    ("1th", "1 Thessalonians"),
    ("2th", "2 Thessalonians"),
    ("1ti", "1 Timothy"),
    ("2ti", "2 Timothy"),
];

/// English display name for a book abbreviation (case-insensitive).
pub fn display_name(abbreviation: &str) -> Option<&'static str> {
    BOOK_NAMES
        .iter()
        .find(|(abbrev, _)| abbrev.eq_ignore_ascii_case(abbreviation))
        .map(|(_, name)| *name)
}

/// Catalog entry for `id`, if it is a known dataset.
pub fn known_source(id: &str) -> Option<&'static KnownSource> {
    KNOWN_SOURCES.iter().find(|s| s.id == id)
}
