//! Static MCP resources and prompt templates.

use rmcp::model::{AnnotateAble, RawResource, Resource, ResourceContents};

pub const README_URI: &str = "docs://weather/readme";
pub const BRIEFING_PROMPT: &str = "nowcast_briefing";

const MARKDOWN: &str = "text/markdown";

const README_TEXT: &str = "# MCP Weather Nowcast Server (KMA)

## 환경변수
- KMA_SERVICE_KEY: 공공데이터포털 인증키(ServiceKey)
- PORT: HTTP Stream 포트(기본 8080)
- KMA_ENDPOINT, KMA_TIMEOUT_SECS: 업스트림 주소와 요청 제한 시간(선택)
- KMA_NOWCAST_CONFIG: TOML 설정 파일 경로(선택)

## Tools
### list_supported_cities
- 지원 도시 목록을 반환합니다.

### get_now_weather
- 입력: city (예: 서울/부산/대구/인천/광주/대전/울산/세종)
- 규칙:
  - base_date: 당일(KST) 고정
  - base_time: 최근 정각(HH00) -> 데이터 없으면 -1시간(동일 날짜만)
- 출력:
  - 실황: 기온/습도/강수/바람/기타 그룹으로 묶은 JSON
  - PTY(강수형태)와 VEC(풍향)는 한글 설명 포함
  - attempts: 실제로 시도한 발표시각별 결과
";

pub fn readme_resource() -> Resource {
    let mut raw = RawResource::new(README_URI, "readme".to_string());
    raw.description = Some("서버 사용 가이드".to_string());
    raw.mime_type = Some(MARKDOWN.to_string());
    raw.no_annotation()
}

/// Contents for `uri`, or `None` when no such resource exists.
pub fn read(uri: &str) -> Option<ResourceContents> {
    if uri != README_URI {
        return None;
    }
    let mut contents = ResourceContents::text(README_TEXT, README_URI);
    if let ResourceContents::TextResourceContents { mime_type, .. } = &mut contents {
        *mime_type = Some(MARKDOWN.to_string());
    }
    Some(contents)
}

pub fn briefing_prompt(city: &str) -> String {
    format!(
        "당신은 기상 브리핑을 만드는 도우미입니다.
MCP tool `get_now_weather` 결과(JSON)를 읽고, '{city}'의 현재 날씨를 3-5문장으로 요약하세요.

포함할 내용:
- 기온(기온), 습도(습도)
- 강수형태(강수형태 설명)와 1시간 강수량(1시간 강수량)
- 풍향(풍향 16방위)과 풍속(풍속)
원본에 없는 값은 추정하지 말고 '데이터에 없음'이라고 답하세요.
"
    )
}
