//! Static name tables for the request boundary.
//!
//! Maps human-readable district and commodity names onto the ids the
//! persisted artifacts are keyed by.

use common::{Error, LocationId, Result, SeriesKey};

const DISTRICTS: &[(&str, u32)] = &[
    ("Coimbatore", 1),
    ("Cuddalore", 2),
    ("Erode", 3),
    ("Kancheepuram", 4),
    ("Madurai", 5),
    ("Thanjavur", 7),
    ("Thiruvannamalai", 8),
    ("Thiruvarur", 9),
    ("Villupuram", 10),
    ("Virudhunagar", 11),
    ("Dharmapuri", 12),
    ("Dindigul", 13),
    ("Nagapattinam", 16),
    ("Nagercoil (Kannyiakumari)", 17),
    ("Namakkal", 18),
    ("Pudukkottai", 20),
    ("Ramanathapuram", 21),
    ("Salem", 22),
    ("Theni", 24),
    ("Thiruvellore", 27),
    ("Vellore", 29),
    ("Ariyalur", 30),
];

const COMMODITIES: &[(&str, u32)] = &[
    ("Paddy(Dhan)(Common)", 2),
    ("Maize", 4),
    ("Jowar(Sorghum)", 5),
    ("Bengal Gram(Gram)(Whole)", 6),
    ("Black Gram (Urd Beans)(Whole)", 8),
    ("Green Gram (Moong)(Whole)", 9),
    ("Groundnut", 10),
    ("Soyabean", 13),
    ("Sunflower", 14),
    ("Cotton", 15),
    ("Banana", 19),
    ("Chili Red", 26),
    ("Ginger(Dry)", 27),
    ("Bajra(Pearl Millet/Cumbu)", 28),
    ("Ragi (Finger Millet)", 30),
    ("Brinjal", 35),
    ("Cashewnuts", 36),
    ("Black pepper", 38),
    ("Turmeric", 39),
    ("Coriander(Leaves)", 43),
    ("Coffee", 45),
    ("Arhar (Tur/Red Gram)(Whole)", 49),
    ("Green Peas", 50),
    ("Onion", 72),
    ("Gur(Jaggery)", 74),
    ("Tomato", 78),
    ("Bottle gourd", 82),
    ("Cowpea (Lobia/Karamani)", 92),
    ("Cotton Seed", 99),
    ("Tapioca", 100),
    ("Corriander seed", 108),
    ("Pepper ungarbled", 110),
    ("Rubber", 111),
    ("Coconut Seed", 112),
    ("Kulthi(Horse Gram)", 114),
    ("Karamani", 115),
    ("Thinai (Italian Millet)", 116),
    ("Kodo Millet(Varagu)", 117),
    ("Hybrid Cumbu", 119),
    ("T.V. Cumbu", 120),
    ("Castor Seed", 123),
    ("Neem Seed", 126),
    ("Copra", 129),
    ("Dry Chillies", 132),
    ("Coconut", 138),
    ("Arecanut(Betelnut/Supari)", 140),
    ("Tobacco", 141),
    ("Sugarcane", 150),
    ("White Pumpkin", 158),
    ("Raddish", 161),
    ("Sesamum(Sesame,Gingelly,Til)", 207),
    ("Tamarind Fruit", 261),
    ("Beaten Rice", 262),
    ("Bengal Gram Dal (Chana Dal)", 263),
    ("Black Gram Dal (Urd Dal)", 264),
    ("Green Gram Dal (Moong Dal)", 265),
    ("Ground Nut Seed", 268),
    ("Avare Dal", 269),
    ("Gingelly Oil", 276),
    ("Elephant Yam (Suran)", 296),
    ("Groundnut pods (raw)", 312),
    ("Groundnut (Split)", 314),
    ("Spinach", 342),
    ("Kabuli Chana(Chickpeas-White)", 362),
    ("Paddy(Dhan)(Basmati)", 414),
];

/// Exact match first, then a case-insensitive match on the trimmed name.
fn lookup(table: &[(&'static str, u32)], name: &str) -> Option<u32> {
    table
        .iter()
        .find(|(n, _)| *n == name)
        .or_else(|| {
            let wanted = name.trim();
            table.iter().find(|(n, _)| n.eq_ignore_ascii_case(wanted))
        })
        .map(|(_, id)| *id)
}

fn reverse(table: &[(&'static str, u32)], id: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(_, i)| i.to_string() == id)
        .map(|(n, _)| *n)
}

pub fn location_for(district: &str) -> Result<LocationId> {
    lookup(DISTRICTS, district)
        .map(LocationId::from)
        .ok_or_else(|| Error::UnknownName(format!("district {district:?}")))
}

pub fn series_for(commodity: &str) -> Result<SeriesKey> {
    lookup(COMMODITIES, commodity)
        .map(SeriesKey::from)
        .ok_or_else(|| Error::UnknownName(format!("commodity {commodity:?}")))
}

pub fn commodity_name(key: &SeriesKey) -> Option<&'static str> {
    reverse(COMMODITIES, key.as_str())
}
