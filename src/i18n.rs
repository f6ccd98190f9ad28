//! Static UI text in the three languages the planner ships with.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    En,
    #[default]
    Fr,
    Ja,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::En, Language::Fr, Language::Ja];

    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Fr => "fr",
            Language::Ja => "ja",
        }
    }

    pub fn native_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Fr => "Français",
            Language::Ja => "日本語",
        }
    }

    /// Looks up `key`; unknown keys come back unchanged.
    pub fn t<'a>(&self, key: &'a str) -> &'a str {
        let table = match self {
            Language::En => EN,
            Language::Fr => FR,
            Language::Ja => JA,
        };
        table
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
            .unwrap_or(key)
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_lowercase();
        Language::ALL
            .into_iter()
            .find(|l| code == l.code() || code.starts_with(&format!("{}-", l.code())))
            .ok_or_else(|| format!("unsupported language '{}', expected en, fr or ja", s))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

type Table = &'static [(&'static str, &'static str)];

const EN: Table = &[
    ("app.title", "Hiromi & Audran's wedding"),
    ("nav.home", "Home"),
    ("nav.venues", "Venues"),
    ("nav.checklist", "Checklist"),
    ("nav.budget", "Budget"),
    ("header.languageSelector", "Language"),
    ("auth.signIn", "Sign in"),
    ("auth.signOut", "Sign out"),
    ("auth.email", "Email"),
    ("auth.password", "Password"),
    ("home.title", "Our wedding planner"),
    ("home.subtitle", "Venues, checklist and budget in one place"),
    ("checklist.title", "Checklist"),
    ("budget.title", "Budget"),
    ("venues.title", "Wedding venues"),
    ("venues.addButton", "Add a venue"),
    ("venues.headers.region", "Region"),
    ("venues.headers.name", "Name"),
    ("venues.headers.price", "Price"),
    ("venues.headers.comment", "Comment"),
    ("venues.headers.maps", "Maps"),
    ("venues.headers.preview", "Preview"),
    ("venues.headers.image", "Image"),
    ("venues.headers.externalLink", "Link"),
    ("venues.headers.actions", "Actions"),
    ("venues.deleteConfirmation", "Are you sure you want to delete this venue?"),
    ("venues.previewUnavailable", "Location preview not available"),
    ("venues.invalidLocation", "Invalid location data"),
    ("venues.viewOnMaps", "View on Maps"),
    ("venues.empty", "No venues yet"),
    ("common.edit", "Edit"),
    ("common.delete", "Delete"),
];

const FR: Table = &[
    ("app.title", "Le mariage de Hiromi et Audran"),
    ("nav.home", "Accueil"),
    ("nav.venues", "Lieux"),
    ("nav.checklist", "Liste de tâches"),
    ("nav.budget", "Budget"),
    ("header.languageSelector", "Langue"),
    ("auth.signIn", "Se connecter"),
    ("auth.signOut", "Se déconnecter"),
    ("auth.email", "E-mail"),
    ("auth.password", "Mot de passe"),
    ("home.title", "Notre organisateur de mariage"),
    ("home.subtitle", "Lieux, liste de tâches et budget au même endroit"),
    ("checklist.title", "Liste de tâches"),
    ("budget.title", "Budget"),
    ("venues.title", "Lieux de mariage"),
    ("venues.addButton", "Ajouter un lieu"),
    ("venues.headers.region", "Région"),
    ("venues.headers.name", "Endroit"),
    ("venues.headers.price", "Prix"),
    ("venues.headers.comment", "Commentaire"),
    ("venues.headers.maps", "Maps"),
    ("venues.headers.preview", "Aperçu"),
    ("venues.headers.image", "Image"),
    ("venues.headers.externalLink", "Lien"),
    ("venues.headers.actions", "Actions"),
    ("venues.deleteConfirmation", "Voulez-vous vraiment supprimer ce lieu ?"),
    ("venues.previewUnavailable", "Aperçu de la localisation indisponible"),
    ("venues.invalidLocation", "Données de localisation invalides"),
    ("venues.viewOnMaps", "Voir sur Maps"),
    ("venues.empty", "Aucun lieu pour le moment"),
    ("common.edit", "Modifier"),
    ("common.delete", "Supprimer"),
];

const JA: Table = &[
    ("app.title", "ひろみとオドランの結婚式"),
    ("nav.home", "ホーム"),
    ("nav.venues", "会場"),
    ("nav.checklist", "チェックリスト"),
    ("nav.budget", "予算"),
    ("header.languageSelector", "言語"),
    ("auth.signIn", "ログイン"),
    ("auth.signOut", "ログアウト"),
    ("auth.email", "メールアドレス"),
    ("auth.password", "パスワード"),
    ("home.title", "結婚式プランナー"),
    ("home.subtitle", "会場・チェックリスト・予算をひとつに"),
    ("checklist.title", "チェックリスト"),
    ("budget.title", "予算"),
    ("venues.title", "結婚式会場"),
    ("venues.addButton", "会場を追加"),
    ("venues.headers.region", "地域"),
    ("venues.headers.name", "名前"),
    ("venues.headers.price", "価格"),
    ("venues.headers.comment", "コメント"),
    ("venues.headers.maps", "地図"),
    ("venues.headers.preview", "プレビュー"),
    ("venues.headers.image", "画像"),
    ("venues.headers.externalLink", "リンク"),
    ("venues.headers.actions", "操作"),
    ("venues.deleteConfirmation", "この会場を削除してもよろしいですか？"),
    ("venues.previewUnavailable", "位置のプレビューは利用できません"),
    ("venues.invalidLocation", "無効な位置データ"),
    ("venues.viewOnMaps", "地図で見る"),
    ("venues.empty", "会場はまだありません"),
    ("common.edit", "編集"),
    ("common.delete", "削除"),
];
