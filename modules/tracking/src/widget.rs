//! Embeddable widget snippet generator.
//!
//! Storefronts paste the generated `<script>` block into their page
//! markup. The script captures one `page_view` on load plus delegated
//! `click` events, and exposes a global command function (`spq`) the host
//! page can call to emit custom events. Delivery is fire-and-forget:
//! `sendBeacon` when available (survives page unload), otherwise a
//! keepalive fetch, with all failures swallowed so the host page is never
//! broken by analytics.

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
};
use serde::Deserialize;

use crate::AppState;

/// Route the generated script posts envelopes to.
pub const TRACK_ROUTE: &str = "/api/track";

// Placeholder substitution instead of format!: the template is full of
// braces, and the two injection points are audited in one place.
const SNIPPET_TEMPLATE: &str = r#"<script>
(function(){
  var endpoint='__INGEST_URL__';
  var store='__STORE_ID__';
  var session=Math.random().toString(36).slice(2);
  var queue=[];
  function send(name,data){
    var body=JSON.stringify({storeId:store,event:name,data:data||{},sessionId:session});
    try{
      if(navigator.sendBeacon){
        navigator.sendBeacon(endpoint,new Blob([body],{type:'application/json'}));
      }else{
        fetch(endpoint,{method:'POST',headers:{'Content-Type':'application/json'},body:body,keepalive:true})
          .catch(function(err){console.debug('storepulse: dropped event',err);});
      }
    }catch(err){console.debug('storepulse: dropped event',err);}
  }
  function flush(){
    while(queue.length){
      var cmd=queue.shift();
      if(cmd[0]==='event'){send(cmd[1],cmd[2]);}
    }
  }
  window.spq=function(){queue.push([].slice.call(arguments));flush();};
  window.spq('event','page_view',{
    url:location.href,
    title:document.title,
    referrer:document.referrer
  });
  document.addEventListener('click',function(e){
    var el=e.target&&e.target.closest?(e.target.closest('a,button')||e.target):e.target;
    if(!el||!el.tagName){return;}
    window.spq('event','click',{
      element:el.tagName.toLowerCase(),
      text:(el.innerText||'').trim().slice(0,100),
      path:el.href||el.action||null,
      classes:el.className||null
    });
  });
})();
</script>"#;

/// Render the embeddable snippet for a store.
///
/// `public_url` is the base this service is reachable on from storefront
/// domains; the ingestion URL is derived from it.
pub fn render_snippet(store_id: &str, public_url: &str) -> String {
    let ingest_url = format!("{}{}", public_url.trim_end_matches('/'), TRACK_ROUTE);
    SNIPPET_TEMPLATE
        .replace("__INGEST_URL__", &js_escape(&ingest_url))
        .replace("__STORE_ID__", &js_escape(store_id))
}

// Both injection points land inside single-quoted JS strings
fn js_escape(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('<', "\\x3c")
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnippetQuery {
    pub store_id: String,
}

/// Handler for GET /api/widget-snippet
pub async fn widget_snippet(
    State(state): State<AppState>,
    Query(params): Query<SnippetQuery>,
) -> impl IntoResponse {
    let snippet = render_snippet(&params.store_id, &state.public_url);
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        snippet,
    )
}
