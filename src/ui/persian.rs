const PERSIAN_DIGITS: [char; 10] = ['۰', '۱', '۲', '۳', '۴', '۵', '۶', '۷', '۸', '۹'];

/// Replace ASCII digits with Persian ones, leaving everything else as is.
pub fn to_persian_digits(s: &str) -> String {
    s.chars()
        .map(|c| match c.to_digit(10) {
            Some(d) if c.is_ascii_digit() => PERSIAN_DIGITS[d as usize],
            _ => c,
        })
        .collect()
}

pub fn persian_number(n: impl std::fmt::Display) -> String {
    to_persian_digits(&n.to_string())
}

/// Persian name for the larger Iranian cities; other names pass through.
pub fn translate_city(city: &str) -> &str {
    match city {
        "Tehran" => "تهران",
        "Isfahan" => "اصفهان",
        "Shiraz" => "شیراز",
        "Mashhad" => "مشهد",
        "Tabriz" => "تبریز",
        "Karaj" => "کرج",
        "Ahvaz" => "اهواز",
        "Qom" => "قم",
        "Kermanshah" => "کرمانشاه",
        "Rasht" => "رشت",
        "Kerman" => "کرمان",
        "Urmia" => "ارومیه",
        "Zahedan" => "زاهدان",
        "Hamadan" => "همدان",
        "Yazd" => "یزد",
        "Ardabil" => "اردبیل",
        "Bandar Abbas" => "بندرعباس",
        "Arak" => "اراک",
        "Eslamshahr" => "اسلامشهر",
        "Zanjan" => "زنجان",
        other => other,
    }
}
