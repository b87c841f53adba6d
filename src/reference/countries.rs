/// Static country-code reference table.
///
/// Codes are two-letter ISO-3166 alpha-2, stored lowercase. Unknown codes are
/// not an error; breakdown consumers fall back to displaying the raw code.
static COUNTRIES: [(&str, &str); 80] = [
    ("ad", "Andorra"),
    ("ae", "United Arab Emirates"),
    ("al", "Albania"),
    ("ar", "Argentina"),
    ("at", "Austria"),
    ("au", "Australia"),
    ("ba", "Bosnia and Herzegovina"),
    ("be", "Belgium"),
    ("bg", "Bulgaria"),
    ("bo", "Bolivia"),
    ("br", "Brazil"),
    ("ca", "Canada"),
    ("ch", "Switzerland"),
    ("cl", "Chile"),
    ("cn", "China"),
    ("co", "Colombia"),
    ("cr", "Costa Rica"),
    ("cu", "Cuba"),
    ("cy", "Cyprus"),
    ("cz", "Czechia"),
    ("de", "Germany"),
    ("dk", "Denmark"),
    ("ec", "Ecuador"),
    ("ee", "Estonia"),
    ("eg", "Egypt"),
    ("es", "Spain"),
    ("fi", "Finland"),
    ("fr", "France"),
    ("gb", "United Kingdom"),
    ("ge", "Georgia"),
    ("gr", "Greece"),
    ("gt", "Guatemala"),
    ("hr", "Croatia"),
    ("hu", "Hungary"),
    ("id", "Indonesia"),
    ("ie", "Ireland"),
    ("il", "Israel"),
    ("in", "India"),
    ("is", "Iceland"),
    ("it", "Italy"),
    ("jo", "Jordan"),
    ("jp", "Japan"),
    ("ke", "Kenya"),
    ("kh", "Cambodia"),
    ("kr", "South Korea"),
    ("la", "Laos"),
    ("lk", "Sri Lanka"),
    ("lt", "Lithuania"),
    ("lu", "Luxembourg"),
    ("lv", "Latvia"),
    ("ma", "Morocco"),
    ("me", "Montenegro"),
    ("mk", "North Macedonia"),
    ("mm", "Myanmar"),
    ("mt", "Malta"),
    ("mx", "Mexico"),
    ("my", "Malaysia"),
    ("nl", "Netherlands"),
    ("no", "Norway"),
    ("np", "Nepal"),
    ("nz", "New Zealand"),
    ("pa", "Panama"),
    ("pe", "Peru"),
    ("ph", "Philippines"),
    ("pl", "Poland"),
    ("pt", "Portugal"),
    ("ro", "Romania"),
    ("rs", "Serbia"),
    ("se", "Sweden"),
    ("sg", "Singapore"),
    ("si", "Slovenia"),
    ("sk", "Slovakia"),
    ("th", "Thailand"),
    ("tr", "Turkey"),
    ("tw", "Taiwan"),
    ("us", "United States"),
    ("uy", "Uruguay"),
    ("vn", "Vietnam"),
    ("za", "South Africa"),
    ("zm", "Zambia"),
];

/// Resolves a country code to its English display name. Case-insensitive;
/// `None` for codes outside the table.
pub fn country_name(code: &str) -> Option<&'static str> {
    let normalized = code.trim().to_ascii_lowercase();
    COUNTRIES
        .iter()
        .find(|(c, _)| *c == normalized)
        .map(|(_, name)| *name)
}
