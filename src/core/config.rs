use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub geocoding: GeocodingConfig,
    pub images: ImageConfig,
    pub drafts: DraftConfig,
    pub map: MapConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub max_request_body_size: usize,
}

/// Settings for the Nominatim geocoder
#[derive(Debug, Clone)]
pub struct GeocodingConfig {
    pub base_url: String,
    /// Nominatim's usage policy requires an identifying user agent
    pub user_agent: String,
    /// Optional comma-separated ISO 3166-1 country filter
    pub country_codes: Option<String>,
    pub timeout: Duration,
}

/// Limits applied when resolving uploaded photos
#[derive(Debug, Clone)]
pub struct ImageConfig {
    pub max_image_size: usize,
    pub max_images_per_upload: usize,
}

/// Lifetime of idle add-destination forms
#[derive(Debug, Clone, Copy)]
pub struct DraftConfig {
    pub ttl: Duration,
    pub sweep_interval: Duration,
}

/// Initial map region shown before any destination is selected
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapConfig {
    pub center_lat: f64,
    pub center_lon: f64,
    pub span_lat: f64,
    pub span_lon: f64,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            geocoding: GeocodingConfig::from_env()?,
            images: ImageConfig::from_env()?,
            drafts: DraftConfig::from_env()?,
            map: MapConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
        })
    }
}

impl AppConfig {
    const DEFAULT_MAX_REQUEST_BODY_SIZE: usize = 50 * 1024 * 1024; // 50MB

    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_request_body_size = env::var("MAX_REQUEST_BODY_SIZE")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_REQUEST_BODY_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| "MAX_REQUEST_BODY_SIZE must be a valid number".to_string())?;

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            max_request_body_size,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl GeocodingConfig {
    const DEFAULT_BASE_URL: &'static str = "https://nominatim.openstreetmap.org";
    const DEFAULT_USER_AGENT: &'static str = "TravelmapCore/0.1 (destination-geocoder)";
    const DEFAULT_TIMEOUT_SECS: u64 = 10;

    pub fn from_env() -> Result<Self, String> {
        let base_url = env::var("GEOCODER_BASE_URL")
            .unwrap_or_else(|_| Self::DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let user_agent = env::var("GEOCODER_USER_AGENT")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| Self::DEFAULT_USER_AGENT.to_string());

        let country_codes = env::var("GEOCODER_COUNTRY_CODES")
            .ok()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());

        let timeout_secs = env::var("GEOCODER_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "GEOCODER_TIMEOUT_SECS must be a valid number".to_string())?;

        Ok(Self {
            base_url,
            user_agent,
            country_codes,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            user_agent: Self::DEFAULT_USER_AGENT.to_string(),
            country_codes: None,
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ImageConfig {
    const DEFAULT_MAX_IMAGE_SIZE: usize = 10 * 1024 * 1024; // 10MB
    const DEFAULT_MAX_IMAGES_PER_UPLOAD: usize = 20;

    pub fn from_env() -> Result<Self, String> {
        let max_image_size = env::var("MAX_IMAGE_SIZE")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_IMAGE_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| "MAX_IMAGE_SIZE must be a valid number".to_string())?;

        let max_images_per_upload = env::var("MAX_IMAGES_PER_UPLOAD")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_IMAGES_PER_UPLOAD.to_string())
            .parse::<usize>()
            .map_err(|_| "MAX_IMAGES_PER_UPLOAD must be a valid number".to_string())?;

        if max_images_per_upload == 0 {
            return Err("MAX_IMAGES_PER_UPLOAD must be at least 1".to_string());
        }

        Ok(Self {
            max_image_size,
            max_images_per_upload,
        })
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            max_image_size: Self::DEFAULT_MAX_IMAGE_SIZE,
            max_images_per_upload: Self::DEFAULT_MAX_IMAGES_PER_UPLOAD,
        }
    }
}

impl DraftConfig {
    const DEFAULT_TTL_SECS: u64 = 60 * 60;
    const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;

    pub fn from_env() -> Result<Self, String> {
        let ttl_secs = env::var("DRAFT_TTL_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_TTL_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DRAFT_TTL_SECS must be a valid number".to_string())?;

        let sweep_interval_secs = env::var("DRAFT_SWEEP_INTERVAL_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_SWEEP_INTERVAL_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DRAFT_SWEEP_INTERVAL_SECS must be a valid number".to_string())?;

        // tokio's interval panics on a zero period
        if ttl_secs == 0 || sweep_interval_secs == 0 {
            return Err(
                "DRAFT_TTL_SECS and DRAFT_SWEEP_INTERVAL_SECS must be at least 1".to_string(),
            );
        }

        Ok(Self {
            ttl: Duration::from_secs(ttl_secs),
            sweep_interval: Duration::from_secs(sweep_interval_secs),
        })
    }
}

impl Default for DraftConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(Self::DEFAULT_TTL_SECS),
            sweep_interval: Duration::from_secs(Self::DEFAULT_SWEEP_INTERVAL_SECS),
        }
    }
}

impl MapConfig {
    const DEFAULT_CENTER_LAT: f64 = 44.0;
    const DEFAULT_CENTER_LON: f64 = 0.0;
    const DEFAULT_SPAN: f64 = 100.0;

    pub fn from_env() -> Result<Self, String> {
        let center_lat = parse_f64_var("MAP_CENTER_LAT", Self::DEFAULT_CENTER_LAT)?;
        let center_lon = parse_f64_var("MAP_CENTER_LON", Self::DEFAULT_CENTER_LON)?;
        let span_lat = parse_f64_var("MAP_SPAN_LAT", Self::DEFAULT_SPAN)?;
        let span_lon = parse_f64_var("MAP_SPAN_LON", Self::DEFAULT_SPAN)?;

        if !(-90.0..=90.0).contains(&center_lat) || !(-180.0..=180.0).contains(&center_lon) {
            return Err("MAP_CENTER_LAT/MAP_CENTER_LON out of range".to_string());
        }
        if span_lat <= 0.0 || span_lon <= 0.0 {
            return Err("MAP_SPAN_LAT/MAP_SPAN_LON must be positive".to_string());
        }

        Ok(Self {
            center_lat,
            center_lon,
            span_lat,
            span_lon,
        })
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center_lat: Self::DEFAULT_CENTER_LAT,
            center_lon: Self::DEFAULT_CENTER_LON,
            span_lat: Self::DEFAULT_SPAN,
            span_lon: Self::DEFAULT_SPAN,
        }
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Travelmap API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "Travel destinations with geocoded locations and photos".to_string());

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

fn parse_f64_var(name: &str, default: f64) -> Result<f64, String> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| format!("{} must be a valid number", name)),
        Err(_) => Ok(default),
    }
}
