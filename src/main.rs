use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use drive_client::config::ClientConfig;
use drive_client::nav::LogNavigator;
use drive_client::notify::LogNotifier;
use drive_client::session::{self, FileStorage, MemoryStorage, SessionStorage};
use drive_client::types::{
    FileInfo, FolderInfo, Identifier, KeywordData, Listing, PageData, SettingInfo, SignUpData,
};
use drive_client::views::{AppMenu, LoginForm};
use drive_client::{Api, ApiError};
use walkdir::WalkDir;

fn print_help() {
    println!("Drive - 파일 관리 클라이언트 ({})", version_string());
    println!();
    println!("사용법:");
    println!("  drive login <email> <password>          로그인");
    println!("  drive signup <email> <username> <pw>    회원가입");
    println!("  drive logout                            로그아웃");
    println!("  drive whoami                            현재 세션 정보");
    println!("  drive refresh                           토큰 재발급");
    println!("  drive ls [path] [type] [page]           파일 목록");
    println!("  drive folders [path] [type] [page]      폴더 목록");
    println!("  drive tabs [type]                       폴더 선택 목록");
    println!("  drive search <keyword> [page]           파일 검색");
    println!("  drive info <fileId>                     파일 세부정보");
    println!("  drive download <fileId> [out]           파일 다운로드");
    println!("  drive upload <path>...                  파일/폴더 업로드");
    println!("  drive status                            다운로드 현황");
    println!("  drive settings [page]                   노드 목록");
    println!("  drive setting <serverId>                노드 세부정보");
    println!("  drive config [api_base]                 서버 주소 확인/변경");
    println!("  -h, --help                              도움말");
    println!("  -V, --version                           버전");
}

fn version_string() -> String {
    format!("v{} ({})", env!("CARGO_PKG_VERSION"), env!("DRIVE_BUILD_DATE"))
}

fn session_storage() -> Arc<dyn SessionStorage> {
    match ClientConfig::session_path() {
        Some(path) => Arc::new(FileStorage::new(path)),
        None => {
            log::warn!("설정 디렉터리를 찾을 수 없음 → 세션을 메모리에만 보관");
            Arc::new(MemoryStorage::new())
        }
    }
}

fn arg<'a>(args: &'a [String], i: usize) -> Option<&'a str> {
    args.get(i).map(String::as_str)
}

fn parse_num<T: std::str::FromStr>(value: Option<&str>, default: T) -> Result<T, ApiError> {
    match value {
        None => Ok(default),
        Some(v) => v
            .parse()
            .map_err(|_| ApiError::Input(format!("숫자가 아닙니다: {}", v))),
    }
}

fn required<'a>(args: &'a [String], i: usize, name: &str) -> Result<&'a str, ApiError> {
    arg(args, i).ok_or_else(|| ApiError::Input(format!("인자가 필요합니다: <{}>", name)))
}

fn print_files(listing: &Listing<FileInfo>) {
    if listing.is_empty() {
        println!("(파일 없음)");
        return;
    }
    for f in &listing.datas {
        let like = if f.is_like == Some(true) { "♥" } else { " " };
        println!("{:>6} {} {:<40} {:>12}  {}", f.id, like, f.filename, f.file_size, f.created_at);
    }
}

fn print_folders(listing: &Listing<FolderInfo>) {
    if listing.is_empty() {
        println!("(폴더 없음)");
        return;
    }
    for folder in &listing.datas {
        println!("📁 {:<40} {:>6}", folder.path, folder.count);
    }
}

fn print_settings(listing: &Listing<SettingInfo>) {
    for s in &listing.datas {
        print_setting(s);
    }
}

fn print_setting(s: &SettingInfo) {
    let limit = s.limit.map(|l| l.to_string()).unwrap_or_else(|| "-".into());
    println!("#{:<4} {}:{}  size={} limit={}", s.id, s.host, s.port, s.size, limit);
}

fn upload_targets(paths: &[String]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for p in paths {
        let path = Path::new(p);
        if path.is_dir() {
            files.extend(
                WalkDir::new(path)
                    .into_iter()
                    .filter_map(|e| e.ok())
                    .filter(|e| e.file_type().is_file())
                    .filter(|e| !e.file_name().to_string_lossy().starts_with('.'))
                    .map(|e| e.into_path()),
            );
        } else {
            files.push(path.to_path_buf());
        }
    }
    files
}

async fn run(args: &[String], config: ClientConfig) -> Result<(), ApiError> {
    let storage = session_storage();
    let api = Api::from_config(
        &config,
        storage.clone(),
        Arc::new(LogNotifier),
        Arc::new(LogNavigator),
    )?;

    match arg(args, 1).unwrap_or("--help") {
        "login" => {
            let form = LoginForm::new(required(args, 2, "email")?, required(args, 3, "password")?);
            let tokens = form.submit(&api).await?;
            println!("👤 {}", tokens.username);
        }
        "signup" => {
            let data = SignUpData {
                email: required(args, 2, "email")?.to_string(),
                username: required(args, 3, "username")?.to_string(),
                password: required(args, 4, "password")?.to_string(),
            };
            api.auth().register(&data).await?;
        }
        "logout" => {
            AppMenu::new(api.clone()).logout()?;
            println!("👋 로그아웃되었습니다");
        }
        "whoami" => match session::load_tokens(storage.as_ref()) {
            Some(tokens) => {
                println!("👤 {}", tokens.username);
                if let Some(claims) = session::decode_claims(&tokens.accesstoken) {
                    if let Some(exp) = claims.expires_at {
                        let state = if claims.is_expired(chrono::Utc::now()) { "만료됨" } else { "유효" };
                        println!("🔑 access token 만료: {} ({})", exp.with_timezone(&chrono::Local), state);
                    }
                }
            }
            None => println!("로그인되어 있지 않습니다"),
        },
        "refresh" => {
            api.auth().refresh().await?;
            println!("🔑 토큰 재발급 완료");
        }
        cmd @ ("ls" | "folders") => {
            let page = PageData {
                path: arg(args, 2).unwrap_or("/").to_string(),
                kind: arg(args, 3).unwrap_or("all").to_string(),
                page: parse_num(arg(args, 4), 0)?,
                identifier: if cmd == "ls" { Identifier::File } else { Identifier::Folder },
            };
            if cmd == "ls" {
                print_files(&api.file().list(&page).await?);
            } else {
                print_folders(&api.file().list(&page).await?);
            }
        }
        "tabs" => {
            print_folders(&api.status().folder(arg(args, 2).unwrap_or("all")).await?);
        }
        "search" => {
            let query = KeywordData {
                keyword: required(args, 2, "keyword")?.to_string(),
                page: parse_num(arg(args, 3), 0)?,
            };
            if query.keyword.is_empty() {
                println!("키워드를 입력해 주세요");
            } else {
                print_files(&api.file().search(&query).await?);
            }
        }
        "info" => {
            let info = api.file().info(parse_num(Some(required(args, 2, "fileId")?), 0)?).await?;
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        "download" => {
            let file_id: u64 = parse_num(Some(required(args, 2, "fileId")?), 0)?;
            let bytes = api.file().download(file_id).await?;
            let out = match arg(args, 3) {
                Some(out) => PathBuf::from(out),
                None => PathBuf::from(&config.download_dir).join(format!("{}", file_id)),
            };
            if let Some(parent) = out.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(&out, &bytes).await?;
            println!("⬇️ {} ({} bytes)", out.display(), bytes.len());
        }
        "upload" => {
            let targets = upload_targets(args.get(2..).unwrap_or_default());
            if targets.is_empty() {
                return Err(ApiError::Input("업로드할 파일이 없습니다".into()));
            }
            let mut last_err = None;
            for path in &targets {
                match api.file().upload(path).await {
                    Ok(_) => println!("⬆️ {}", path.display()),
                    Err(e) => {
                        log::error!("파일 업로드 실패 {}: {}", path.display(), e);
                        last_err = Some(e);
                    }
                }
            }
            if let Some(e) = last_err {
                return Err(e);
            }
        }
        "status" => {
            let status = AppMenu::new(api.clone()).refresh_downloads().await?;
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        "settings" => {
            print_settings(&api.setting().list(parse_num(arg(args, 2), 0)?).await?);
        }
        "setting" => {
            let id = parse_num(Some(required(args, 2, "serverId")?), 0)?;
            print_setting(&api.setting().info(id).await?);
        }
        "config" => match arg(args, 2) {
            Some(base) => {
                let mut config = config;
                config.api_base = base.to_string();
                config.api_root()?;
                config.save()?;
                println!("🌐 {}", config.api_base);
            }
            None => println!("{}", serde_json::to_string_pretty(&config)?),
        },
        "--version" | "-V" => println!("drive {}", version_string()),
        _ => print_help(),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let config = ClientConfig::load();
    log::debug!("main: api_base={} timeout={:?}", config.api_base, config.timeout_secs);

    match run(&args, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // 요청 실패는 토스트로 이미 표시됨
            if !matches!(e, ApiError::Status { .. } | ApiError::Transport(_)) {
                eprintln!("❌ {}", e);
            }
            ExitCode::FAILURE
        }
    }
}
