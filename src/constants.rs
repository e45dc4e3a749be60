pub mod years {

    pub const MIN_YEAR: i32 = 1950;

    /// How far past the current year a release year may be entered.
    pub const YEARS_AHEAD: i32 = 5;
}

pub mod rating {

    pub const MAX: u8 = 5;
}

pub mod catalog {

    pub const COUNTRIES: &[&str] = &[
        "Coreia do Sul",
        "China",
        "Japão",
        "Tailândia",
        "Taiwan",
        "Filipinas",
        "Indonésia",
        "Vietnã",
        "Singapura",
        "Malásia",
    ];

    pub const GENRES: &[&str] = &[
        "Romance",
        "Comédia",
        "Drama",
        "Ação",
        "Thriller",
        "Fantasia",
        "Histórico",
        "Médico",
        "Escolar",
        "Família",
        "Suspense",
        "Crime",
        "Melodrama",
        "Slice of Life",
    ];
}

pub mod shell {

    /// Number of id characters shown in listings.
    pub const SHORT_ID_LEN: usize = 8;

    pub const PROMPT: &str = "doramas> ";
}
