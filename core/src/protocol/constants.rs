//! Centralized obs-websocket constants
//!
//! Everything the discovery strategies match against is fixed data defined
//! here: file locations, INI keys, the URL scheme and the dialog titles.

/// Directory OBS Studio creates under the per-user config directory
pub const SETTINGS_DIR: &str = "obs-studio";

/// Global settings file inside [`SETTINGS_DIR`]
pub const SETTINGS_FILE: &str = "global.ini";

/// INI section holding the websocket server settings
pub const SETTINGS_SECTION: &str = "OBSWebSocket";

pub const PORT_KEY: &str = "ServerPort";

pub const PASSWORD_KEY: &str = "ServerPassword";

/// URL scheme of the connect-info QR code, matched case-sensitively
pub const OBSWS_SCHEME: &str = "obsws";

/// Capacity of the window title buffer, terminator included
pub const TITLE_BUFFER_LEN: usize = 128;

/// Titles of the obs-websocket "connect info" dialog across OBS UI languages
pub const CONNECT_INFO_TITLES: &[&str] = &[
    "معلومات اتصال WebSocket",
    "Informació de connexió del servidor WebSocket",
    "Připojení k WebSocket serveru",
    "WebSocket-forbindelsesinfo",
    "WebSocket-Verbindungsinformationen",
    "Πληροφορίες Σύνδεσης WebSocket",
    "WebSocket Connect Info",
    "Información de conexión de WebSocket",
    "WebSocket'i ühenduse info",
    "WebSocket konexio-informazioa",
    "اطلاعات اتصال سوکت وب",
    "WebSocket-yhteystiedot",
    "Impormasyon ng WebSocket Connect",
    "Informations de connexion WebSocket",
    "מידע חיבור WebSocket",
    "WebSocket कनेक्ट जानकारी दिखाएं",
    "WebSocket kapcsolati információk",
    "WebSocket կապի մանրամասները",
    "Informasi Koneksi WebSocket",
    "Informazioni sulla connessione WebSocket",
    "WebSocket接続情報",
    "WebSocket-კავშირის შესახებ",
    "Zanyariyên girêdanê WebSocket",
    "WebSocket 연결 정보",
    "Maklumat Sambungan WebSocket",
    "WebSocket verbindingsinformatie",
    "Informacje o połączeniu WebSocket",
    "Informação de Conexão WebSocket",
    "Informação de ligação WebSocket",
    "Informațiile conexiunii WebSocket",
    "Сведения о подключении WebSocket",
    "Info WebSocket pripojenia",
    "Podatki o povezavi WebSocket",
    "Anslutningsinfo för WebSocket",
    "WebSocket Bağlanma Bilgileri",
    "Відомості про з'єднання WebSocket",
    "Thông tin kết nối WebSocket",
    "WebSocket 连接信息",
    "WebSocket 連線資訊",
];
