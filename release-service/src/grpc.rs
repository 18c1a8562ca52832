use crate::request::models::{Header, HttpMethod, RequestSpec, ResponseCapture};

pub mod proto {
    tonic::include_proto!("release");
}

// Convert from proto to domain models
impl From<proto::Header> for Header {
    fn from(h: proto::Header) -> Self {
        Header {
            name: h.name,
            value: h.value,
            mask_in_log: h.mask_in_log,
        }
    }
}

impl From<proto::HttpMethod> for HttpMethod {
    fn from(m: proto::HttpMethod) -> Self {
        match m {
            proto::HttpMethod::Get => HttpMethod::Get,
            proto::HttpMethod::Post => HttpMethod::Post,
            proto::HttpMethod::Put => HttpMethod::Put,
            proto::HttpMethod::Patch => HttpMethod::Patch,
            proto::HttpMethod::Delete => HttpMethod::Delete,
            proto::HttpMethod::Head => HttpMethod::Head,
            proto::HttpMethod::Options => HttpMethod::Options,
            proto::HttpMethod::Unspecified => HttpMethod::default(),
        }
    }
}

impl From<proto::RequestSpec> for RequestSpec {
    fn from(s: proto::RequestSpec) -> Self {
        let method = proto::HttpMethod::try_from(s.method)
            .unwrap_or(proto::HttpMethod::Unspecified)
            .into();
        RequestSpec {
            url: s.url,
            method,
            body: s.body,
            headers: s.headers.into_iter().map(Header::from).collect(),
            proxy: if s.proxy.is_empty() { None } else { Some(s.proxy) },
        }
    }
}

impl From<proto::ResponseCapture> for ResponseCapture {
    fn from(r: proto::ResponseCapture) -> Self {
        ResponseCapture {
            status: r.status as u16,
            content: r.content,
            content_type: r.content_type,
        }
    }
}

// Convert from domain models to proto
impl From<Header> for proto::Header {
    fn from(h: Header) -> Self {
        proto::Header {
            name: h.name,
            value: h.value,
            mask_in_log: h.mask_in_log,
        }
    }
}

impl From<HttpMethod> for proto::HttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => proto::HttpMethod::Get,
            HttpMethod::Post => proto::HttpMethod::Post,
            HttpMethod::Put => proto::HttpMethod::Put,
            HttpMethod::Patch => proto::HttpMethod::Patch,
            HttpMethod::Delete => proto::HttpMethod::Delete,
            HttpMethod::Head => proto::HttpMethod::Head,
            HttpMethod::Options => proto::HttpMethod::Options,
        }
    }
}

impl From<RequestSpec> for proto::RequestSpec {
    fn from(s: RequestSpec) -> Self {
        proto::RequestSpec {
            url: s.url,
            method: i32::from(proto::HttpMethod::from(s.method)),
            body: s.body,
            headers: s.headers.into_iter().map(proto::Header::from).collect(),
            proxy: s.proxy.unwrap_or_default(),
        }
    }
}

impl From<ResponseCapture> for proto::ResponseCapture {
    fn from(r: ResponseCapture) -> Self {
        proto::ResponseCapture {
            status: u32::from(r.status),
            content: r.content,
            content_type: r.content_type,
        }
    }
}
